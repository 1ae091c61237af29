//! XML-RPC wire codec.
//!
//! Requests are written directly as text with escaped content; responses
//! are tokenized with `quick-xml` and parsed into `serde_json::Value`s, which
//! keep struct member order.

use crate::error::{ImportError, ImportResult};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use serde_json::{Map, Number, Value};
use std::iter::Peekable;
use std::vec::IntoIter;

/// Encodes a method call with positional parameters.
#[must_use]
pub fn encode_call(method: &str, params: &[Value]) -> String {
    let mut out = String::from("<?xml version=\"1.0\"?>\n<methodCall><methodName>");
    out.push_str(&escape(method));
    out.push_str("</methodName><params>");
    for param in params {
        out.push_str("<param>");
        encode_value(param, &mut out);
        out.push_str("</param>");
    }
    out.push_str("</params></methodCall>");
    out
}

fn encode_value(value: &Value, out: &mut String) {
    out.push_str("<value>");
    match value {
        Value::Null => out.push_str("<nil/>"),
        Value::Bool(b) => {
            out.push_str(if *b { "<boolean>1</boolean>" } else { "<boolean>0</boolean>" });
        }
        Value::Number(n) => match n.as_i64() {
            Some(i) if i32::try_from(i).is_ok() => out.push_str(&format!("<int>{i}</int>")),
            Some(i) => out.push_str(&format!("<i8>{i}</i8>")),
            None => out.push_str(&format!("<double>{}</double>", n.as_f64().unwrap_or_default())),
        },
        Value::String(s) => {
            out.push_str("<string>");
            out.push_str(&escape(s.as_str()));
            out.push_str("</string>");
        }
        Value::Array(items) => {
            out.push_str("<array><data>");
            for item in items {
                encode_value(item, out);
            }
            out.push_str("</data></array>");
        }
        Value::Object(members) => {
            out.push_str("<struct>");
            for (name, member) in members {
                out.push_str("<member><name>");
                out.push_str(&escape(name.as_str()));
                out.push_str("</name>");
                encode_value(member, out);
                out.push_str("</member>");
            }
            out.push_str("</struct>");
        }
    }
    out.push_str("</value>");
}

/// Turns a response body into text using the charset named by its XML
/// declaration. Without a declaration the body is UTF-8.
pub fn decode_body(bytes: &[u8]) -> ImportResult<String> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match declared_encoding(bytes)?.as_deref() {
        None | Some("utf-8" | "utf8" | "us-ascii" | "ascii") => String::from_utf8(bytes.to_vec())
            .map_err(|e| ImportError::Protocol(format!("response is not valid UTF-8: {e}"))),
        Some("iso-8859-1" | "iso8859-1" | "iso_8859-1" | "latin1" | "latin-1" | "l1") => {
            Ok(bytes.iter().map(|&b| char::from(b)).collect())
        }
        Some(other) => Err(ImportError::Protocol(format!(
            "unsupported response encoding: {other}"
        ))),
    }
}

// Only the declaration is read here; it is ASCII whatever the body charset.
fn declared_encoding(bytes: &[u8]) -> ImportResult<Option<String>> {
    let mut reader = Reader::from_reader(bytes);
    loop {
        match reader.read_event() {
            Ok(Event::Decl(decl)) => {
                return match decl.encoding() {
                    Some(Ok(label)) => Ok(Some(
                        String::from_utf8_lossy(&label).trim().to_ascii_lowercase(),
                    )),
                    Some(Err(e)) => Err(ImportError::Protocol(format!(
                        "bad XML declaration: {e}"
                    ))),
                    None => Ok(None),
                };
            }
            Ok(Event::Text(t)) if t.iter().all(u8::is_ascii_whitespace) => {}
            _ => return Ok(None),
        }
    }
}

/// Decodes a method response.
///
/// Returns the single response parameter, or [`ImportError::Fault`] when the
/// remote side answered with a fault.
pub fn decode_response(xml: &str) -> ImportResult<Value> {
    let mut parser = Parser::new(tokenize(xml)?);
    parser.expect_open("methodResponse")?;
    parser.skip_whitespace();
    match parser.tokens.next() {
        Some(Token::Open(name)) if name == "params" => {
            parser.expect_open("param")?;
            let value = parser.value()?;
            parser.expect_close("param")?;
            parser.expect_close("params")?;
            parser.expect_close("methodResponse")?;
            Ok(value)
        }
        Some(Token::Open(name)) if name == "fault" => {
            let value = parser.value()?;
            Err(fault(value))
        }
        other => Err(unexpected("<params> or <fault>", other)),
    }
}

fn fault(value: Value) -> ImportError {
    let code = match value.get("faultCode") {
        Some(Value::Number(n)) => n.as_i64().unwrap_or_default(),
        Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    };
    let message = match value.get("faultString") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::from("unspecified fault"),
    };
    ImportError::Fault { code, message }
}

#[derive(Debug)]
enum Token {
    Open(String),
    Close(String),
    Text(String),
}

fn tokenize(xml: &str) -> ImportResult<Vec<Token>> {
    let mut reader = Reader::from_str(xml);
    let mut tokens = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => tokens.push(Token::Open(element_name(e.local_name().as_ref()))),
            Ok(Event::End(e)) => tokens.push(Token::Close(element_name(e.local_name().as_ref()))),
            Ok(Event::Empty(e)) => {
                let name = element_name(e.local_name().as_ref());
                tokens.push(Token::Open(name.clone()));
                tokens.push(Token::Close(name));
            }
            Ok(Event::Text(t)) => {
                let text = t
                    .unescape()
                    .map_err(|e| ImportError::Protocol(format!("bad text content: {e}")))?;
                push_text(&mut tokens, &text);
            }
            Ok(Event::CData(c)) => push_text(&mut tokens, &String::from_utf8_lossy(&c.into_inner())),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ImportError::Protocol(format!(
                    "malformed XML at byte {}: {e}",
                    reader.buffer_position()
                )));
            }
        }
    }
    Ok(tokens)
}

fn element_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

// Adjacent text and CDATA sections form one value.
fn push_text(tokens: &mut Vec<Token>, text: &str) {
    if let Some(Token::Text(previous)) = tokens.last_mut() {
        previous.push_str(text);
    } else {
        tokens.push(Token::Text(text.to_string()));
    }
}

fn unexpected(expected: &str, found: Option<Token>) -> ImportError {
    let found = match found {
        Some(Token::Open(name)) => format!("<{name}>"),
        Some(Token::Close(name)) => format!("</{name}>"),
        Some(Token::Text(text)) => format!("text {text:?}"),
        None => String::from("end of document"),
    };
    ImportError::Protocol(format!("expected {expected}, found {found}"))
}

struct Parser {
    tokens: Peekable<IntoIter<Token>>,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter().peekable(),
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.tokens.peek(), Some(Token::Text(t)) if t.trim().is_empty()) {
            self.tokens.next();
        }
    }

    fn at_close(&mut self, name: &str) -> bool {
        matches!(self.tokens.peek(), Some(Token::Close(n)) if n == name)
    }

    fn take_text(&mut self) -> Option<String> {
        if matches!(self.tokens.peek(), Some(Token::Text(_))) {
            if let Some(Token::Text(text)) = self.tokens.next() {
                return Some(text);
            }
        }
        None
    }

    fn expect_open(&mut self, name: &str) -> ImportResult<()> {
        self.skip_whitespace();
        match self.tokens.next() {
            Some(Token::Open(n)) if n == name => Ok(()),
            other => Err(unexpected(&format!("<{name}>"), other)),
        }
    }

    fn expect_close(&mut self, name: &str) -> ImportResult<()> {
        self.skip_whitespace();
        match self.tokens.next() {
            Some(Token::Close(n)) if n == name => Ok(()),
            other => Err(unexpected(&format!("</{name}>"), other)),
        }
    }

    fn text_until_close(&mut self, name: &str) -> ImportResult<String> {
        let text = self.take_text().unwrap_or_default();
        match self.tokens.next() {
            Some(Token::Close(n)) if n == name => Ok(text),
            other => Err(unexpected(&format!("</{name}>"), other)),
        }
    }

    fn value(&mut self) -> ImportResult<Value> {
        self.expect_open("value")?;
        let text = self.take_text();
        if self.at_close("value") {
            self.tokens.next();
            // Untyped values are strings.
            return Ok(Value::String(text.unwrap_or_default()));
        }
        if text.is_some_and(|t| !t.trim().is_empty()) {
            return Err(ImportError::Protocol(
                "text mixed with a typed value".to_string(),
            ));
        }
        let value = match self.tokens.next() {
            Some(Token::Open(ty)) => self.typed(&ty)?,
            other => return Err(unexpected("a value type", other)),
        };
        self.expect_close("value")?;
        Ok(value)
    }

    fn typed(&mut self, ty: &str) -> ImportResult<Value> {
        match ty {
            "string" | "dateTime.iso8601" => Ok(Value::String(self.text_until_close(ty)?)),
            "int" | "i4" | "i8" => {
                let raw = self.text_until_close(ty)?;
                raw.trim()
                    .parse::<i64>()
                    .map(Value::from)
                    .map_err(|e| ImportError::Protocol(format!("bad <{ty}> {raw:?}: {e}")))
            }
            "boolean" => {
                let raw = self.text_until_close(ty)?;
                match raw.trim() {
                    "1" => Ok(Value::Bool(true)),
                    "0" => Ok(Value::Bool(false)),
                    other => Err(ImportError::Protocol(format!("bad <boolean> {other:?}"))),
                }
            }
            "double" => {
                let raw = self.text_until_close(ty)?;
                let parsed = raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| ImportError::Protocol(format!("bad <double> {raw:?}: {e}")))?;
                Number::from_f64(parsed)
                    .map(Value::Number)
                    .ok_or_else(|| ImportError::Protocol(format!("non-finite <double> {raw:?}")))
            }
            "nil" => {
                self.expect_close("nil")?;
                Ok(Value::Null)
            }
            "base64" => {
                let raw = self.text_until_close(ty)?;
                let compact: String = raw.split_whitespace().collect();
                let bytes = BASE64
                    .decode(compact.as_bytes())
                    .map_err(|e| ImportError::Protocol(format!("bad <base64>: {e}")))?;
                Ok(Value::String(String::from_utf8_lossy(&bytes).into_owned()))
            }
            "struct" => self.members(),
            "array" => self.array(),
            other => Err(ImportError::Protocol(format!("unsupported value type <{other}>"))),
        }
    }

    fn members(&mut self) -> ImportResult<Value> {
        let mut map = Map::new();
        loop {
            self.skip_whitespace();
            match self.tokens.next() {
                Some(Token::Close(n)) if n == "struct" => return Ok(Value::Object(map)),
                Some(Token::Open(n)) if n == "member" => {
                    self.expect_open("name")?;
                    let name = self.text_until_close("name")?;
                    let value = self.value()?;
                    self.expect_close("member")?;
                    map.insert(name, value);
                }
                other => return Err(unexpected("<member> or </struct>", other)),
            }
        }
    }

    fn array(&mut self) -> ImportResult<Value> {
        self.expect_open("data")?;
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.at_close("data") {
                self.tokens.next();
                break;
            }
            items.push(self.value()?);
        }
        self.expect_close("array")?;
        Ok(Value::Array(items))
    }
}
