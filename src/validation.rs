// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Field validation rules for sign-up and sign-in forms.
//!
//! These are the mock backend's acceptance rules, not RFC-grade parsing:
//! the email check is a permissive `local@domain.tld` shape test, and
//! password strength is a checklist the sign-up form renders live.

use std::fmt;

/// Symbols that satisfy the special-character password requirement.
const PASSWORD_SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Check that a string looks like `local@domain.tld`.
///
/// Both parts must be non-empty, contain no whitespace and no extra `@`,
/// and the domain must contain an interior dot.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    let part_ok = |s: &str| !s.is_empty() && !s.contains(char::is_whitespace) && !s.contains('@');

    if !part_ok(local) || !part_ok(domain) {
        return false;
    }

    // The dot must separate a name from a TLD, not lead or trail.
    match domain.find('.') {
        Some(idx) => idx > 0 && !domain.ends_with('.'),
        None => false,
    }
}

/// One of the five password requirements shown in the sign-up form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRequirement {
    MinLength,
    Uppercase,
    Lowercase,
    Digit,
    Symbol,
}

impl PasswordRequirement {
    /// All requirements in the order the form lists them.
    pub const ALL: [PasswordRequirement; 5] = [
        PasswordRequirement::MinLength,
        PasswordRequirement::Uppercase,
        PasswordRequirement::Lowercase,
        PasswordRequirement::Digit,
        PasswordRequirement::Symbol,
    ];

    fn is_met(self, password: &str) -> bool {
        match self {
            PasswordRequirement::MinLength => password.len() >= 8,
            PasswordRequirement::Uppercase => password.chars().any(|c| c.is_ascii_uppercase()),
            PasswordRequirement::Lowercase => password.chars().any(|c| c.is_ascii_lowercase()),
            PasswordRequirement::Digit => password.chars().any(|c| c.is_ascii_digit()),
            PasswordRequirement::Symbol => password.chars().any(|c| PASSWORD_SYMBOLS.contains(c)),
        }
    }
}

impl fmt::Display for PasswordRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            PasswordRequirement::MinLength => "Password must be at least 8 characters long",
            PasswordRequirement::Uppercase => "Password must contain an uppercase letter",
            PasswordRequirement::Lowercase => "Password must contain a lowercase letter",
            PasswordRequirement::Digit => "Password must contain a number",
            PasswordRequirement::Symbol => "Password must contain a special character",
        };
        f.write_str(message)
    }
}

/// Requirements the password does not meet, in form order.
///
/// Empty means the password is acceptable for sign-up.
pub fn unmet_password_requirements(password: &str) -> Vec<PasswordRequirement> {
    PasswordRequirement::ALL
        .into_iter()
        .filter(|req| !req.is_met(password))
        .collect()
}

/// Coarse strength tier shown next to the password field.
///
/// Advisory UI feedback only; acceptance is governed by
/// [`unmet_password_requirements`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Good,
    Strong,
}

/// Tier from the count of satisfied requirements.
pub fn password_strength(password: &str) -> PasswordStrength {
    let met = PasswordRequirement::ALL
        .into_iter()
        .filter(|req| req.is_met(password))
        .count();

    match met {
        0..=2 => PasswordStrength::Weak,
        3 => PasswordStrength::Medium,
        4 => PasswordStrength::Good,
        _ => PasswordStrength::Strong,
    }
}

/// Check a display name: at least 2 characters after trimming.
pub fn is_valid_name(name: &str) -> bool {
    name.trim().chars().count() >= 2
}
