//! Contact detection and classification
//!
//! Each frame the world runs an explicit overlap pass over all body pairs
//! that want contact, then routes every contact through `classify`. Scoring
//! is checked before death so one contact can never signal both.

use super::body::{Body, BodyId, BodyTag};

/// What a contact means for the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// Gate passed; `remove` is the non-player body of the pair (the trigger)
    Score { remove: Option<BodyId> },
    /// Player hit something solid
    Fatal,
    Ignored,
}

/// A pair of overlapping bodies, in stable id order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub a: BodyId,
    pub b: BodyId,
}

/// Classify a contact. Either side may already be gone (removed earlier in
/// the same frame), in which case it is `None`.
pub fn classify(a: Option<&Body>, b: Option<&Body>) -> ContactOutcome {
    let tag = |body: Option<&Body>| body.map(|b| b.tag).unwrap_or_default();

    if tag(a) == BodyTag::ScoreTrigger || tag(b) == BodyTag::ScoreTrigger {
        let remove = if a.is_some_and(Body::is_player) {
            b.map(|b| b.id)
        } else {
            a.map(|a| a.id)
        };
        return ContactOutcome::Score { remove };
    }

    match (a, b) {
        (Some(a), Some(b)) if a.is_player() || b.is_player() => ContactOutcome::Fatal,
        _ => ContactOutcome::Ignored,
    }
}

/// Find all overlapping pairs. `bodies` must be sorted by id; contacts come
/// out in lexicographic (a, b) order.
pub fn find_contacts(bodies: &[Body]) -> Vec<Contact> {
    let mut contacts = Vec::new();
    for (i, a) in bodies.iter().enumerate() {
        if a.removed {
            continue;
        }
        for b in &bodies[i + 1..] {
            if a.wants_contact_with(b) && a.overlaps(b) {
                contacts.push(Contact { a: a.id, b: b.id });
            }
        }
    }
    contacts
}
