// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Placeholder substitution for message templates.
//!
//! Recognized tokens: `{name}`, `{phone}`, `{address}`, `{rating}`,
//! `{website}`, plus the Portuguese aliases `{nome}`, `{telefone}`,
//! `{endereco}` and `{avaliacao}`. Anything else in braces is copied as is.

use zapsend_core::Contact;

fn field<'a>(contact: &'a Contact, token: &str) -> Option<&'a str> {
    let value = match token {
        "name" | "nome" => Some(contact.name.as_str()),
        "phone" | "telefone" => Some(contact.phone.as_str()),
        "address" | "endereco" => contact.address.as_deref(),
        "rating" | "avaliacao" => contact.rating.as_deref(),
        "website" => contact.website.as_deref(),
        _ => return None,
    };
    Some(value.unwrap_or(""))
}

/// Renders `template` for `contact`.
///
/// Single pass: substituted values are never scanned again, so a contact
/// named `{phone}` is printed literally.
pub fn render_template(template: &str, contact: &Contact) -> String {
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after
            .find('}')
            .and_then(|close| field(contact, &after[..close]).map(|v| (v, close)));

        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
