//! Built-in note templates.
//!
//! Applying a template replaces the note title with the template name and
//! the content with the template body.

/// One built-in template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteTemplate {
    pub name: &'static str,
    pub icon: &'static str,
    pub content: &'static str,
}

pub const TEMPLATES: &[NoteTemplate] = &[
    NoteTemplate {
        name: "Meeting Notes",
        icon: "📝",
        content: "# Meeting Notes

**Date:** [Date]
**Attendees:** [Names]

## Agenda
- 

## Discussion Points
- 

## Action Items
- [ ] 

## Next Steps
- ",
    },
    NoteTemplate {
        name: "To-Do List",
        icon: "✅",
        content: "# To-Do List

## Today
- [ ] 
- [ ] 
- [ ] 

## This Week
- [ ] 
- [ ] 

## Later
- [ ] ",
    },
    NoteTemplate {
        name: "Journal Entry",
        icon: "📔",
        content: "# Journal Entry

**Date:** [Date]

## How I'm Feeling
[Your thoughts here]

## Today's Highlights
- 
- 
- 

## Gratitude
- 
- 
- 

## Tomorrow's Goals
- ",
    },
    NoteTemplate {
        name: "Project Plan",
        icon: "🎯",
        content: "# Project Plan

## Overview
[Brief description]

## Goals
- 
- 

## Timeline
- **Phase 1:** 
- **Phase 2:** 
- **Phase 3:** 

## Resources Needed
- 
- 

## Success Metrics
- ",
    },
    NoteTemplate {
        name: "Book Notes",
        icon: "📚",
        content: "# Book Notes

**Title:** [Book Title]
**Author:** [Author Name]
**Date Started:** [Date]

## Key Takeaways
- 
- 
- 

## Favorite Quotes
> 

## My Thoughts
[Your reflections]

## Action Items
- [ ] ",
    },
    NoteTemplate {
        name: "Recipe",
        icon: "🍳",
        content: "# Recipe Name

**Prep Time:** [Time]
**Cook Time:** [Time]
**Servings:** [Number]

## Ingredients
- 
- 
- 

## Instructions
1. 
2. 
3. 

## Notes
- ",
    },
];

/// Looks a template up by name, ignoring ASCII case.
pub fn find_template(name: &str) -> Option<&'static NoteTemplate> {
    let name = name.trim();
    TEMPLATES
        .iter()
        .find(|template| template.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::{find_template, TEMPLATES};

    #[test]
    fn every_template_starts_with_a_heading() {
        assert_eq!(TEMPLATES.len(), 6);
        for template in TEMPLATES {
            assert!(template.content.starts_with("# "), "{}", template.name);
        }
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(find_template("recipe").map(|t| t.name), Some("Recipe"));
        assert!(find_template("Shopping").is_none());
    }
}
