//! Company banner shown when a chat goes live.

use console::style;

use pitchbot_types::profile::CompanyProfile;

/// Print the company header and the sidebar details (tone, services).
pub fn print_company_banner(profile: &CompanyProfile, model: &str, session_id: &str) {
    println!();
    println!("  {}", style(&profile.company_name).cyan().bold());
    println!("  {}", style(&profile.tagline).italic());
    println!("  {}", style(&profile.description).dim());
    println!();
    println!("  {}  {}", style("Tone:").bold(), title_case(&profile.tone));
    println!("  {}", style("Services:").bold());
    for service in &profile.services {
        println!("    • {service}");
    }
    println!();
    println!(
        "  {}  {}   {}  {}",
        style("Model:").bold(),
        style(model).dim(),
        style("Session:").bold(),
        style(&session_id[..8.min(session_id.len())]).dim()
    );
    println!();
    println!(
        "  {}",
        style("Type a message, /voice to speak, /help for commands, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
}

/// Capitalize the first letter of every word, lowercase the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
