use uuid::Uuid;

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Trims free text and maps blank input to `None`.
pub fn normalize_text(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// First eight hex digits of an identifier, as shown in listings.
pub fn short_id(id: Uuid) -> String {
    let mut short = id.simple().to_string();
    short.truncate(8);
    short
}

// Re-export common dependencies so consumers can rely on this module as a façade.
pub use chrono;
pub use serde;
pub use uuid;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_text_drops_blank_values() {
        assert_eq!(normalize_text(Some("   ".into())), None);
        assert_eq!(normalize_text(None), None);
        assert_eq!(
            normalize_text(Some("  Alice ".into())),
            Some("Alice".to_string())
        );
    }

    #[test]
    fn short_id_is_eight_hex_digits() {
        let id = Uuid::new_v4();
        let short = short_id(id);
        assert_eq!(short.len(), 8);
        assert!(id.simple().to_string().starts_with(&short));
    }
}
