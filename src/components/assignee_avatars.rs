//! Assignee Avatars Component
//!
//! Initials badges for a task's assignees, resolved against the contacts
//! list by email.

use board_core::Contact;
use leptos::prelude::*;

use crate::store::{use_board_store, BoardStateStoreFields};

/// Badges shown before collapsing the rest into "+N"
const MAX_AVATARS: usize = 3;

const FALLBACK_COLOR: &str = "#2a3647";

#[derive(Clone, Debug, PartialEq)]
struct Avatar {
    initials: String,
    color: String,
    title: String,
}

fn avatar_for(contacts: &[Contact], email: &str) -> Avatar {
    match contacts.iter().find(|c| c.email.eq_ignore_ascii_case(email)) {
        Some(contact) => Avatar {
            initials: contact.initials(),
            color: contact.color.clone().unwrap_or_else(|| FALLBACK_COLOR.to_string()),
            title: contact.name.clone(),
        },
        None => Avatar {
            initials: email.chars().next().map(|c| c.to_uppercase().to_string()).unwrap_or_default(),
            color: FALLBACK_COLOR.to_string(),
            title: email.to_string(),
        },
    }
}

#[component]
pub fn AssigneeAvatars(#[prop(into)] emails: Signal<Vec<String>>) -> impl IntoView {
    let store = use_board_store();

    let avatars = move || {
        emails.with(|emails| {
            store.contacts().with(|contacts| {
                emails
                    .iter()
                    .take(MAX_AVATARS)
                    .map(|email| avatar_for(contacts, email))
                    .collect::<Vec<_>>()
            })
        })
    };
    let overflow = move || emails.with(|e| e.len().saturating_sub(MAX_AVATARS));

    view! {
        <div class="avatars">
            {move || {
                avatars()
                    .into_iter()
                    .map(|a| {
                        view! {
                            <span
                                class="avatar"
                                title=a.title
                                style=format!("background-color: {}", a.color)
                            >
                                {a.initials}
                            </span>
                        }
                    })
                    .collect_view()
            }}
            <Show when=move || { overflow() > 0 }>
                <span class="avatar avatar-more">{move || format!("+{}", overflow())}</span>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_contact_uses_initials_and_color() {
        let mut ada = Contact::new("Ada Lovelace", "ada@example.com");
        ada.color = Some("#ff7a00".to_string());
        let avatar = avatar_for(&[ada], "ADA@example.com");
        assert_eq!(avatar.initials, "AL");
        assert_eq!(avatar.color, "#ff7a00");
        assert_eq!(avatar.title, "Ada Lovelace");
    }

    #[test]
    fn test_unknown_email_falls_back() {
        let avatar = avatar_for(&[], "grace@example.com");
        assert_eq!(avatar.initials, "G");
        assert_eq!(avatar.color, FALLBACK_COLOR);
    }
}
