pub const DETECTION_SYSTEM: &str = include_str!("../data/prompts/detection_system.txt");
pub const DETECTION_USER: &str = include_str!("../data/prompts/detection_user.txt");
pub const ANALYSIS_LEVEL: &str = include_str!("../data/prompts/analysis_level.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.trim().to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

/// Trailing marker appended after the image in the user message.
pub fn analysis_level(level: u32) -> String {
    render(ANALYSIS_LEVEL, &[("level", &level.to_string())])
}
