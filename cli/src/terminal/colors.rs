use colored::Color;

pub const SEPARATOR: Color = Color::BrightBlack;
pub const LABEL: Color = Color::BrightCyan;
pub const ROUND: Color = Color::BrightBlack;

pub const RTT_FAST: Color = Color::Green;
pub const RTT_SLOW: Color = Color::Yellow;
pub const RTT_BAD: Color = Color::Red;
