//! Inline HTML pages

use crate::auth::{Role, Session};

pub const FORBIDDEN: &str = "<!doctype html>\
<html><head><title>403 Forbidden</title></head>\
<body><h1>Forbidden</h1><p>You do not have access to this page.</p>\
<p><a href=\"/login\">Log in</a></p></body></html>";

pub const LOGIN: &str = "<!doctype html>\
<html><head><title>Log in</title></head><body>\
<h1>Panel roster</h1>\
<form method=\"post\" action=\"/login\">\
<label>Email <input name=\"email\" type=\"email\" required></label>\
<label>Password <input name=\"password\" type=\"password\" required></label>\
<button type=\"submit\">Log in</button>\
</form></body></html>";

pub fn index(session: &Session) -> String {
    let mut skills = String::new();
    for i in 1..=8 {
        skills.push_str(&format!(
            "<input name=\"skill_{i}\" placeholder=\"Skill {i}\">"
        ));
    }

    let bulk = if session.role == Role::Admin {
        "<h2>Bulk import</h2>\
<form method=\"post\" action=\"/save_bulk?table=profiles\" enctype=\"multipart/form-data\">\
<input type=\"file\" name=\"file\" accept=\".xlsx\"><button type=\"submit\">Import profiles</button></form>\
<form method=\"post\" action=\"/save_bulk?table=slots\" enctype=\"multipart/form-data\">\
<input type=\"file\" name=\"file\" accept=\".xlsx\"><button type=\"submit\">Import slots</button></form>"
    } else {
        ""
    };

    format!(
        "<!doctype html>\
<html><head><title>Panel roster</title></head><body>\
<p>Signed in as {identity} ({role}) <a href=\"/logout\">Log out</a></p>\
<h2>Create profile</h2>\
<form method=\"post\" action=\"/save_data\">\
<input name=\"email\" placeholder=\"Panel Email ID\" required>\
<input name=\"grade\" placeholder=\"Grade\">\
<input name=\"evaluation_round\" placeholder=\"Evaluation round\">\
<input name=\"name\" placeholder=\"Name\">\
<input name=\"contact\" placeholder=\"Contact number\">\
<input name=\"tsr\" placeholder=\"TSR code / name\">\
<input name=\"account\" placeholder=\"Account\">\
<input name=\"competency\" placeholder=\"Competency code\">\
<input name=\"geo\" placeholder=\"Work geo\">\
{skills}<button type=\"submit\">Save</button></form>\
<h2>Search</h2>\
<form method=\"get\" action=\"/search_employee\">\
<input name=\"employee_id\" placeholder=\"Panel Email ID\"><button type=\"submit\">Profile</button></form>\
<form method=\"get\" action=\"/search_slot\">\
<input name=\"employee_id\" placeholder=\"Panel Email ID\"><button type=\"submit\">Slot</button></form>\
{bulk}</body></html>",
        identity = escape(&session.identity),
        role = session.role,
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
