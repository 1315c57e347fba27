//! Form-boundary validation for crawl submissions. Malformed input never
//! reaches the core; it is rejected here with a message for the user.

/// Parse a comma-separated domain list and a depth argument into a
/// validated crawl request.
pub fn parse_crawl_request(domains_raw: &str, depth_raw: &str) -> Result<(Vec<String>, u8), String> {
    let domains: Vec<String> = domains_raw
        .split(',')
        .map(str::trim)
        .filter(|domain| !domain.is_empty())
        .map(ToOwned::to_owned)
        .collect();

    if domains.is_empty() {
        return Err("Please enter at least one domain".to_string());
    }

    let invalid: Vec<&str> = domains
        .iter()
        .map(String::as_str)
        .filter(|domain| !is_valid_domain(domain))
        .collect();
    if !invalid.is_empty() {
        return Err(format!(
            "Invalid domain format: {}. Use a format like example.com, www.example.com, or http://example.com",
            invalid.join(", ")
        ));
    }

    let max_depth: u8 = depth_raw
        .parse()
        .map_err(|_| format!("Max depth must be a number, got {depth_raw:?}"))?;
    if !(1..=5).contains(&max_depth) {
        return Err("Max depth must be between 1 and 5".to_string());
    }

    Ok((domains, max_depth))
}

/// Accepts bare domains with optional `http://`/`https://` scheme and
/// optional `www.` prefix: at least two dot-separated labels, alphanumeric
/// with inner hyphens, final label alphabetic and two characters or more.
fn is_valid_domain(domain: &str) -> bool {
    let stripped = domain
        .strip_prefix("http://")
        .or_else(|| domain.strip_prefix("https://"))
        .unwrap_or(domain);
    let stripped = stripped.strip_prefix("www.").unwrap_or(stripped);

    let labels: Vec<&str> = stripped.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    if !labels.iter().all(|label| is_valid_label(label)) {
        return false;
    }

    let tld = labels[labels.len() - 1];
    tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}

fn is_valid_label(label: &str) -> bool {
    if label.is_empty() || label.starts_with('-') || label.ends_with('-') {
        return false;
    }
    label
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
}
