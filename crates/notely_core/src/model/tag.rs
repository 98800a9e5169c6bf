//! Tag presets and tag-list editing helpers.
//!
//! Tags are free-form strings stored in note order. Storage allows
//! duplicates; these helpers keep user edits duplicate-free.

/// Built-in tag offered by the tag picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetTag {
    pub name: &'static str,
    /// `#RRGGBB` display colour.
    pub color: &'static str,
}

pub const PRESET_TAGS: &[PresetTag] = &[
    PresetTag {
        name: "Work",
        color: "#3B82F6",
    },
    PresetTag {
        name: "Personal",
        color: "#10B981",
    },
    PresetTag {
        name: "Ideas",
        color: "#F59E0B",
    },
    PresetTag {
        name: "Important",
        color: "#EF4444",
    },
    PresetTag {
        name: "Todo",
        color: "#8B5CF6",
    },
    PresetTag {
        name: "Meeting",
        color: "#06B6D4",
    },
];

/// Returns the preset with this exact name.
pub fn preset_tag(name: &str) -> Option<&'static PresetTag> {
    PRESET_TAGS.iter().find(|tag| tag.name == name)
}

/// Removes `name` when present, otherwise appends it.
pub fn toggle_tag(tags: &mut Vec<String>, name: &str) {
    if let Some(index) = tags.iter().position(|tag| tag == name) {
        tags.remove(index);
    } else {
        tags.push(name.to_string());
    }
}

/// Appends a trimmed custom tag.
///
/// Returns `false` (and leaves `tags` untouched) for blank input or a tag
/// that is already present.
pub fn add_custom_tag(tags: &mut Vec<String>, raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() || tags.iter().any(|tag| tag == trimmed) {
        return false;
    }
    tags.push(trimmed.to_string());
    true
}

/// Tags that are not presets, in note order.
pub fn custom_tags(tags: &[String]) -> Vec<&str> {
    tags.iter()
        .map(String::as_str)
        .filter(|tag| preset_tag(tag).is_none())
        .collect()
}
