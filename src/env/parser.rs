// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::Severity;

/// One parsed token of a directive string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `*`, `all`, `+*` or `+all`.
    ActivateAll,
    /// `-*` or `-all`.
    DeactivateAll,
    /// `name` or `+name`.
    Activate(String),
    /// `-name`; a trailing `*` names a wildcard entry.
    Deactivate(String),
    /// `name+`, where `name` is on the severity scale.
    Floor(Severity),
    /// `prefix*`, holding the full pattern including the `*`.
    Wildcard(String),
}

/// The outcome of parsing a directive string.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParseResult {
    /// Recognized directives, in order.
    pub directives: Vec<Directive>,
    /// Tokens that were not understood; they have no effect.
    pub ignored: Vec<String>,
}

fn is_all(token: &str) -> bool {
    token == "*" || token == "all"
}

fn is_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(|c: char| c == '*' || c == ',' || c.is_whitespace())
}

fn parse_token(token: &str) -> Option<Directive> {
    if let Some(rest) = token.strip_prefix('-') {
        if is_all(rest) {
            return Some(Directive::DeactivateAll);
        }
        let name = rest.strip_suffix('*').unwrap_or(rest);
        return is_name(name).then(|| Directive::Deactivate(rest.to_owned()));
    }

    let rest = token.strip_prefix('+').unwrap_or(token);
    if is_all(rest) {
        return Some(Directive::ActivateAll);
    }
    if let Some(name) = rest.strip_suffix('+') {
        return Severity::from_name(name).map(Directive::Floor);
    }
    if let Some(prefix) = rest.strip_suffix('*') {
        return is_name(prefix).then(|| Directive::Wildcard(rest.to_owned()));
    }
    is_name(rest).then(|| Directive::Activate(rest.to_owned()))
}

/// Parse a comma-separated directive string.
///
/// Tokens are trimmed and empty tokens are skipped. Nothing here fails: a token that does not
/// parse is collected in [`ParseResult::ignored`].
pub fn parse_directives(input: &str) -> ParseResult {
    let mut result = ParseResult::default();
    for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match parse_token(token) {
            Some(directive) => result.directives.push(directive),
            None => result.ignored.push(token.to_owned()),
        }
    }
    result
}
