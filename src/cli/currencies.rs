use super::ui;
use crate::core::config::AppConfig;

/// Lists the selectable currencies, marking the reference one.
pub fn run(config: &AppConfig) {
    for line in render(config) {
        println!("{line}");
    }
}

fn render(config: &AppConfig) -> Vec<String> {
    config
        .currencies
        .iter()
        .map(|code| {
            if *code == config.reference_currency {
                format!(
                    "{code} {}",
                    ui::style_text("(reference)", ui::StyleType::Subtle)
                )
            } else {
                code.clone()
            }
        })
        .collect()
}
