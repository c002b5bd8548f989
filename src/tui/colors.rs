use ratatui::style::Color;

/// Accent color per category token
pub fn color_for_category(category: &str) -> Color {
    match category {
        "carro" => Color::Cyan,
        "suv" => Color::Green,
        "caminhao" => Color::Yellow,
        "moto" => Color::Magenta,
        _ => Color::White,
    }
}

/// Accent color per product line token
pub fn color_for_line(line: &str) -> Color {
    match line {
        "efb" => Color::LightBlue,
        "agm" => Color::LightRed,
        "clean" => Color::LightGreen,
        _ => Color::Gray,
    }
}
