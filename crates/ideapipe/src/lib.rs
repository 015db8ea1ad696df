//! Public facade crate for `ideapipe`.
//!
//! This crate contains no IO or provider-specific logic.
//! It re-exports the backend-agnostic types, heuristics and traits from `ideapipe-core`.

pub use ideapipe_core::*;

#[cfg(test)]
mod tests {
    #[test]
    fn reexports_scoring_surface() {
        let items = vec![crate::DiscussionItem::new(
            "fitness app needed",
            "",
            50,
            10,
            crate::Source::Reddit,
        )];
        let ranked = crate::rank::score_and_rank(&items, "fitness", 1);
        assert_eq!(ranked.len(), 1);
        assert!(crate::dedupe::is_unique::<&str>("anything", &[], 0.5));
    }
}
