//! Shareable score and invite messages

pub const GAME_TITLE: &str = "Who's Older?";

fn with_link(text: String, link: Option<&str>) -> String {
    match link {
        Some(link) if !link.trim().is_empty() => format!("{}\n{}", text, link.trim()),
        _ => text,
    }
}

/// Message for the game-over share action
pub fn score_message(streak: u32, best_streak: u32, new_high: bool, link: Option<&str>) -> String {
    let text = if new_high {
        format!(
            "New High Score! I just got {} correct in a row on {}\nCan you beat my score?",
            streak, GAME_TITLE
        )
    } else {
        format!(
            "I got {} correct in a row on {}\nCan you beat my score of {}?",
            streak, GAME_TITLE, best_streak
        )
    };
    with_link(text, link)
}

/// Message for the menu's share entry
pub fn invite_message(link: Option<&str>) -> String {
    with_link(
        format!("Check out {} - can you guess which actor is older?", GAME_TITLE),
        link,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_message_variants() {
        let high = score_message(9, 9, true, Some("https://example.org/older"));
        assert!(high.starts_with("New High Score! I just got 9 correct"));
        assert!(high.ends_with("\nhttps://example.org/older"));

        let regular = score_message(3, 9, false, None);
        assert!(regular.contains("I got 3 correct in a row"));
        assert!(regular.ends_with("beat my score of 9?"));
    }

    #[test]
    fn test_invite_skips_blank_link() {
        let invite = invite_message(Some("  "));
        assert!(invite.contains(GAME_TITLE));
        assert!(!invite.contains('\n'));
    }
}
