//! Page bodies for the portal.

use crate::state::Flash;
use crate::templates::{self, escape};

/// Home page, with the widget iframe once a viewer token was minted.
pub fn home_page(
    project: &str,
    username: &str,
    iframe_src: Option<&str>,
    flashes: &[Flash],
) -> String {
    let widget = match iframe_src {
        Some(src) => format!(
            r#"<iframe src="{src}" title="Embedded widget"></iframe>"#,
            src = escape(src)
        ),
        None => r#"<form method="POST" action="/">
                <p>The widget loads with a token minted for you on demand.</p>
                <button type="submit">Load widget</button>
            </form>"#
            .to_string(),
    };

    let content = format!(
        r#"{flashes}
        <div class="card">
            <h2>Hello, {username}</h2>
            {widget}
        </div>"#,
        flashes = templates::flashes(flashes),
        username = escape(username),
        widget = widget,
    );

    templates::layout(project, "Home", &content)
}

/// Login page.
pub fn login_page(
    project: &str,
    redirect: Option<&str>,
    error: Option<&str>,
    notice: Option<&str>,
) -> String {
    let error_banner = templates::error_banner(match error {
        Some("invalid") => Some("Invalid username or password. Please try again."),
        Some(_) => Some("Login failed."),
        None => None,
    });

    let notice_banner = match notice {
        Some("logged_out") => r#"<div class="flash flash-info">You have been logged out.</div>"#,
        _ => "",
    };

    let redirect_input = redirect
        .map(|r| {
            format!(
                r#"<input type="hidden" name="redirect" value="{}">"#,
                escape(r)
            )
        })
        .unwrap_or_default();

    let content = format!(
        r#"{notice_banner}
        {error_banner}
        <div class="card">
            <h2>Sign in</h2>
            <form method="POST" action="/login">
                {redirect_input}
                <label for="username">Username</label>
                <input type="text" id="username" name="username" required autofocus>
                <label for="password">Password</label>
                <input type="password" id="password" name="password" required>
                <button type="submit">Sign in</button>
            </form>
            <p>No account yet? <a href="/register">Register</a>.</p>
        </div>"#,
    );

    templates::layout_anonymous(project, "Login", &content)
}

/// Registration page.
pub fn register_page(project: &str, error: Option<&str>) -> String {
    let error_banner = templates::error_banner(match error {
        Some("username_taken") => Some("That username is already taken."),
        Some("bad_username") => {
            Some("Usernames cannot be empty or contain whitespace or '|'.")
        }
        Some("bad_email") => Some("Please enter a valid email address."),
        Some("weak_password") => Some("Passwords must be at least 8 characters."),
        Some("password_mismatch") => Some("The passwords do not match."),
        Some(_) => Some("Registration failed."),
        None => None,
    });

    let content = format!(
        r#"{error_banner}
        <div class="card">
            <h2>Create an account</h2>
            <form method="POST" action="/register">
                <label for="username">Username</label>
                <input type="text" id="username" name="username" required autofocus>
                <label for="email">Email</label>
                <input type="email" id="email" name="email" required>
                <label for="password">Password</label>
                <input type="password" id="password" name="password" required>
                <label for="password_confirm">Confirm password</label>
                <input type="password" id="password_confirm" name="password_confirm" required>
                <button type="submit">Register</button>
            </form>
            <p>Already registered? <a href="/login">Sign in</a>.</p>
        </div>"#,
    );

    templates::layout_anonymous(project, "Register", &content)
}
