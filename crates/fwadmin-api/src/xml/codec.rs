// XML/XPath codec
//
// Builds the XPath selectors and element fragments sent to the device, and
// decodes `<response status="..">` documents: status, vendor messages, the
// keygen key, commit job id, and the admin user entries of a config get.

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Error, preview};

/// XPath of the admin user collection in the candidate config.
pub const USERS_XPATH: &str = "/config/mgt-config/users";

/// Commit command body.
pub const COMMIT_CMD: &str = "<commit></commit>";

/// XPath of a single admin user entry.
///
/// The name is embedded in a single-quoted literal; callers must reject
/// names for which [`is_xpath_safe`] is false.
pub fn user_xpath(name: &str) -> String {
    format!("{USERS_XPATH}/entry[@name='{name}']")
}

/// Whether `name` can be embedded in [`user_xpath`] without changing the
/// meaning of the selector.
pub fn is_xpath_safe(name: &str) -> bool {
    !name.is_empty() && !name.contains(['\'', '[', ']', '/'])
}

/// Element fragment setting a password and superuser permissions.
///
/// The API has no role parameter for this call: every write grants
/// superuser. The password is sent in clear and hashed by the device on commit.
pub fn password_element(password: &str) -> String {
    format!(
        "<password>{}</password>\
         <permissions><role-based><superuser>yes</superuser></role-based></permissions>",
        escape(password)
    )
}

/// One `users/entry` element of a config get.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEntry {
    pub name: String,
    /// `permissions/role-based/superuser` is present under the entry.
    pub superuser: bool,
}

/// A decoded `<response>` document.
#[derive(Debug, Clone, Default)]
pub struct XmlResponse {
    /// Value of the root `status` attribute.
    pub status: String,
    /// Value of the root `code` attribute, when present.
    pub code: Option<String>,
    /// All `<msg>` text, nested `<line>` elements joined with `"; "`.
    pub message: Option<String>,
    /// First `<key>` text (keygen).
    pub key: Option<String>,
    /// First `<job>` text (commit).
    pub job: Option<String>,
    /// Admin user entries (config get on [`USERS_XPATH`]).
    pub users: Vec<UserEntry>,
    /// The undecoded document.
    pub raw: String,
}

impl XmlResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// The vendor message, or a generic one naming the status.
    pub fn message_or_status(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| format!("status={}", self.status))
    }
}

/// Decode a `<response>` document.
pub fn parse_response(body: &str) -> Result<XmlResponse, Error> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut out = XmlResponse {
        raw: body.to_owned(),
        ..XmlResponse::default()
    };
    let mut seen_root = false;
    let mut stack: Vec<String> = Vec::new();
    let mut messages: Vec<String> = Vec::new();
    // Index in `stack` of the user entry being read, plus the entry itself.
    let mut current: Option<(usize, UserEntry)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = tag_name(e);
                if seen_root {
                    if name == "entry" && stack.last().is_some_and(|p| p == "users") {
                        current = Some((stack.len(), user_entry(e, body)?));
                    } else if let Some((depth, entry)) = current.as_mut() {
                        mark_superuser(&name, &stack, *depth, entry);
                    }
                } else {
                    read_root(e, &name, body, &mut out)?;
                    seen_root = true;
                }
                stack.push(name);
            }
            Ok(Event::Empty(ref e)) => {
                let name = tag_name(e);
                if seen_root {
                    if name == "entry" && stack.last().is_some_and(|p| p == "users") {
                        out.users.push(user_entry(e, body)?);
                    } else if let Some((depth, entry)) = current.as_mut() {
                        mark_superuser(&name, &stack, *depth, entry);
                    }
                } else {
                    read_root(e, &name, body, &mut out)?;
                    seen_root = true;
                }
            }
            Ok(Event::End(_)) => {
                stack.pop();
                if current.as_ref().is_some_and(|(depth, _)| *depth == stack.len()) {
                    if let Some((_, entry)) = current.take() {
                        out.users.push(entry);
                    }
                }
            }
            Ok(Event::Text(ref t)) => {
                let text = t.unescape().map_err(|e| malformed(&e, body))?;
                collect_text(&text, &stack, &mut out, &mut messages);
            }
            Ok(Event::CData(ref c)) => {
                let text = String::from_utf8_lossy(c).trim().to_owned();
                collect_text(&text, &stack, &mut out, &mut messages);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(malformed(&e, body)),
            _ => {}
        }
    }

    if !seen_root {
        return Err(malformed(&"document has no <response> element", body));
    }
    if !stack.is_empty() {
        return Err(malformed(&"document ended inside an open element", body));
    }

    if !messages.is_empty() {
        out.message = Some(messages.join("; "));
    }
    Ok(out)
}

// ── Helpers ─────────────────────────────────────────────────────────

fn tag_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn attribute(e: &BytesStart<'_>, name: &str, body: &str) -> Result<Option<String>, Error> {
    match e.try_get_attribute(name) {
        Ok(Some(attr)) => attr
            .unescape_value()
            .map(|v| Some(v.into_owned()))
            .map_err(|err| malformed(&err, body)),
        Ok(None) => Ok(None),
        Err(err) => Err(malformed(&err, body)),
    }
}

fn read_root(
    e: &BytesStart<'_>,
    name: &str,
    body: &str,
    out: &mut XmlResponse,
) -> Result<(), Error> {
    if name != "response" {
        return Err(malformed(&format!("unexpected root element <{name}>"), body));
    }
    out.status = attribute(e, "status", body)?.unwrap_or_default();
    out.code = attribute(e, "code", body)?;
    Ok(())
}

fn user_entry(e: &BytesStart<'_>, body: &str) -> Result<UserEntry, Error> {
    let name = attribute(e, "name", body)?
        .ok_or_else(|| malformed(&"user entry without a name attribute", body))?;
    Ok(UserEntry {
        name,
        superuser: false,
    })
}

/// `superuser` directly under `<entry><permissions><role-based>`.
fn mark_superuser(name: &str, stack: &[String], depth: usize, entry: &mut UserEntry) {
    if name != "superuser" {
        return;
    }
    let path = stack.get(depth + 1..).unwrap_or_default();
    if path.len() == 2 && path[0] == "permissions" && path[1] == "role-based" {
        entry.superuser = true;
    }
}

fn collect_text(text: &str, stack: &[String], out: &mut XmlResponse, messages: &mut Vec<String>) {
    if text.is_empty() {
        return;
    }
    if stack.iter().any(|s| s == "msg") {
        messages.push(text.to_owned());
        return;
    }
    match stack.last().map(String::as_str) {
        Some("key") if out.key.is_none() => out.key = Some(text.to_owned()),
        Some("job") if out.job.is_none() => out.job = Some(text.to_owned()),
        _ => {}
    }
}

fn malformed(err: &dyn std::fmt::Display, body: &str) -> Error {
    Error::Deserialization {
        message: format!("malformed XML response: {err} (body preview: {:?})", preview(body)),
        body: body.to_owned(),
    }
}
