//! Source aliasing for RuuviTag devices.
//!
//! Maps tag addresses to human-readable names ("Sauna", "Porch") used in
//! activity events.

use std::collections::BTreeMap;

/// Address-to-name mapping. Keys are upper-cased addresses.
pub type AliasMap = BTreeMap<String, String>;

/// A parsed alias mapping a tag address to a human-readable name.
#[derive(Debug, Clone, PartialEq)]
pub struct Alias {
    /// The tag address (e.g., "AA:BB:CC:DD:EE:FF")
    pub address: String,
    /// The human-readable name (e.g., "Sauna")
    pub name: String,
}

/// Parse an alias from a string in the format "ADDRESS=NAME".
///
/// # Example
/// ```
/// use kiuas_monitor::alias::parse_alias;
///
/// let alias = parse_alias("aa:bb:cc:dd:ee:ff=Sauna").unwrap();
/// assert_eq!(alias.address, "AA:BB:CC:DD:EE:FF");
/// assert_eq!(alias.name, "Sauna");
/// ```
pub fn parse_alias(src: &str) -> Result<Alias, String> {
    let (address, name) = src
        .split_once('=')
        .ok_or_else(|| "invalid alias: expected format ADDRESS=NAME".to_string())?;

    let (address, name) = (address.trim(), name.trim());
    if address.is_empty() || name.is_empty() {
        return Err("invalid alias: address and name must not be empty".to_string());
    }

    Ok(Alias {
        address: address.to_uppercase(),
        name: name.to_string(),
    })
}

/// Convert a slice of Alias values into an AliasMap. Later aliases win.
pub fn to_map(aliases: &[Alias]) -> AliasMap {
    aliases
        .iter()
        .map(|a| (a.address.clone(), a.name.clone()))
        .collect()
}

/// Name to show for a source: its alias if one exists, else the address itself.
pub fn resolve_name(source_id: &str, aliases: &AliasMap) -> String {
    aliases
        .get(&source_id.to_uppercase())
        .cloned()
        .unwrap_or_else(|| source_id.to_string())
}
