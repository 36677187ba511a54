use std::fmt::Write;

use crate::users::User;

pub const HEADER: &str = "Random user";
pub const BUTTON_PROMPT: &str = "Press Enter to get random user, q to quit";
pub const LOADING: &str = "Loading...";
pub const USERNAME_COLUMN: &str = "Username";
pub const PHONE_COLUMN: &str = "Phone number";

/// Everything the renderer needs to draw one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub user: Option<User>,
    pub loading: bool,
}

pub fn render(state: &ViewState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{HEADER}");
    let _ = writeln!(out, "[{BUTTON_PROMPT}]");
    if state.loading {
        let _ = writeln!(out, "{LOADING}");
    }
    if let Some(user) = &state.user {
        out.push_str(&render_table(user));
    }
    out
}

fn render_table(user: &User) -> String {
    let name_width = USERNAME_COLUMN.len().max(user.name.chars().count());
    let phone_width = PHONE_COLUMN.len().max(user.phone.chars().count());
    let rule = format!("+-{}-+-{}-+", "-".repeat(name_width), "-".repeat(phone_width));

    let mut out = String::new();
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        "| {:<name_width$} | {:<phone_width$} |",
        USERNAME_COLUMN, PHONE_COLUMN
    );
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        "| {:<name_width$} | {:<phone_width$} |",
        user.name, user.phone
    );
    let _ = writeln!(out, "{rule}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[fixture]
    fn alice() -> User {
        User::new(3, "Alice", "555")
    }

    #[rstest]
    fn empty_state_must_render_only_header_and_button() {
        let frame = render(&ViewState::default());
        assert_eq!(frame, format!("{HEADER}\n[{BUTTON_PROMPT}]\n"));
    }

    #[rstest]
    fn loading_state_must_show_the_indicator(alice: User) {
        let frame = render(&ViewState {
            user: Some(alice),
            loading: true,
        });
        assert!(frame.contains(LOADING));
        assert!(frame.contains("Alice"));
    }

    #[rstest]
    fn table_must_align_user_under_headers(alice: User) {
        let frame = render(&ViewState {
            user: Some(alice),
            loading: false,
        });
        let expected = "\
+----------+--------------+
| Username | Phone number |
+----------+--------------+
| Alice    | 555          |
+----------+--------------+
";
        assert!(frame.ends_with(expected), "{frame}");
        assert!(!frame.contains(LOADING));
    }

    #[rstest]
    fn columns_must_widen_for_long_values() {
        let user = User::new(1, "Leanne Graham", "1-770-736-8031 x56442");
        let frame = render(&ViewState {
            user: Some(user),
            loading: false,
        });
        assert!(frame.contains("| Leanne Graham | 1-770-736-8031 x56442 |"));
        assert!(frame.contains("| Username      | Phone number          |"));
    }
}
