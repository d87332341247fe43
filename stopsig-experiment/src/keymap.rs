use stopsig_core::{ResponseKey, TaskType};

/// One logical response key and the physical key codes accepted for it.
/// The alias lists carry the locale variants the task was deployed with and
/// are identical for both task blocks; resolution is first match in
/// declaration order.
#[derive(Debug, Clone, Copy)]
pub struct KeyAliases {
    pub key: ResponseKey,
    pub codes: &'static [&'static str],
}

pub const TASK_KEY_ALIASES: &[KeyAliases] = &[
    KeyAliases {
        key: ResponseKey::S,
        codes: &["keys", "keyש"],
    },
    KeyAliases {
        key: ResponseKey::A,
        codes: &["keya", "keyש"],
    },
    KeyAliases {
        key: ResponseKey::K,
        codes: &["keyk", "keyק"],
    },
    KeyAliases {
        key: ResponseKey::L,
        codes: &["keyl", "keyל"],
    },
];

/// Map a raw key event to the logical response key for the active task.
/// `logical` is the character the layout produced (if any); `code` is the
/// lowercased physical key-code name. Practice accepts only the space bar.
pub fn resolve(task: TaskType, logical: Option<char>, code: &str) -> Option<ResponseKey> {
    match task {
        TaskType::Practice => {
            (code == "space" || logical == Some(' ')).then_some(ResponseKey::Space)
        }
        TaskType::Simple | TaskType::Complex => {
            let logical = logical.map(|c| c.to_ascii_lowercase());
            for alias in TASK_KEY_ALIASES {
                if logical == Some(alias.key.as_char()) || alias.codes.contains(&code) {
                    return Some(alias.key);
                }
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin_characters_resolve_directly() {
        assert_eq!(resolve(TaskType::Simple, Some('s'), "keys"), Some(ResponseKey::S));
        assert_eq!(resolve(TaskType::Simple, Some('A'), "keya"), Some(ResponseKey::A));
        assert_eq!(resolve(TaskType::Complex, Some('k'), "keyk"), Some(ResponseKey::K));
        assert_eq!(resolve(TaskType::Complex, Some('l'), "keyl"), Some(ResponseKey::L));
    }

    #[test]
    fn locale_alias_codes_resolve_without_a_latin_character() {
        assert_eq!(resolve(TaskType::Simple, Some('ק'), "keyק"), Some(ResponseKey::K));
        assert_eq!(resolve(TaskType::Simple, Some('ל'), "keyל"), Some(ResponseKey::L));
    }

    #[test]
    fn shared_alias_resolves_first_match_in_table_order() {
        // keyש is aliased to both S and A in the deployed table; S wins.
        assert_eq!(resolve(TaskType::Simple, Some('ש'), "keyש"), Some(ResponseKey::S));
    }

    #[test]
    fn both_task_variants_share_one_table() {
        for alias in TASK_KEY_ALIASES {
            for code in alias.codes {
                assert_eq!(
                    resolve(TaskType::Simple, None, code),
                    resolve(TaskType::Complex, None, code)
                );
            }
        }
    }

    #[test]
    fn unmapped_keys_do_not_resolve() {
        assert_eq!(resolve(TaskType::Simple, Some('q'), "keyq"), None);
        assert_eq!(resolve(TaskType::Simple, None, "space"), None);
    }

    #[test]
    fn practice_accepts_only_space() {
        assert_eq!(resolve(TaskType::Practice, Some(' '), "space"), Some(ResponseKey::Space));
        assert_eq!(resolve(TaskType::Practice, Some('s'), "keys"), None);
    }
}
