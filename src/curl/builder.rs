use reqwest::{Client, Method, Request, Url};

use crate::error::{AppError, AppResult, DescriptorError};

use super::DescriptorBuilder;
use super::files::BodyFiles;
use super::options::{CurlCommand, DataPart};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Builds requests from curl command lines. `@file` payloads are read once
/// and reused by every later build.
#[derive(Debug, Default)]
pub struct CurlBuilder {
    files: BodyFiles,
}

impl CurlBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn body_files(&self) -> &BodyFiles {
        &self.files
    }
}

impl DescriptorBuilder for CurlBuilder {
    fn build(&self, client: &Client, descriptor: &str) -> AppResult<Request> {
        CurlCommand::parse(descriptor)?.to_request(client, &self.files)
    }
}

impl CurlCommand {
    /// Resolves the effective method: `-X`, then `-I`, then body presence.
    ///
    /// # Errors
    ///
    /// Returns an error when `-X` names an invalid method token.
    pub fn resolve_method(&self) -> Result<Method, DescriptorError> {
        if let Some(method) = self.method.as_deref() {
            let upper = method.trim().to_ascii_uppercase();
            return Method::from_bytes(upper.as_bytes()).map_err(|_err| {
                DescriptorError::InvalidMethod {
                    method: method.to_owned(),
                }
            });
        }
        if self.head {
            return Ok(Method::HEAD);
        }
        if !self.data.is_empty() && !self.get {
            return Ok(Method::POST);
        }
        Ok(Method::GET)
    }

    /// Resolves the target URL, defaulting to `http://` when no scheme is
    /// given. With `-G` the payload is appended to the query string.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is missing or invalid, or a `-G`
    /// payload file cannot be read.
    pub fn resolve_url(&self, files: &BodyFiles) -> Result<Url, DescriptorError> {
        let raw = self
            .url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(DescriptorError::MissingUrl)?;
        let with_scheme = if raw.contains("://") {
            raw.to_owned()
        } else {
            format!("http://{}", raw)
        };
        let mut url = Url::parse(&with_scheme).map_err(|err| DescriptorError::InvalidUrl {
            url: with_scheme.clone(),
            source: err,
        })?;

        if self.get && !self.data.is_empty() {
            let payload = String::from_utf8_lossy(&self.payload(files)?).into_owned();
            let query = match url.query().filter(|query| !query.is_empty()) {
                Some(existing) => format!("{}&{}", existing, payload),
                None => payload,
            };
            url.set_query(Some(&query));
        }
        Ok(url)
    }

    /// Joins every data fragment with `&`, reading `@file` fragments.
    ///
    /// # Errors
    ///
    /// Returns an error when a referenced file cannot be read.
    pub fn payload(&self, files: &BodyFiles) -> Result<Vec<u8>, DescriptorError> {
        let mut body = Vec::new();
        for (idx, part) in self.data.iter().enumerate() {
            if idx > 0 {
                body.push(b'&');
            }
            match part {
                DataPart::Text(text) => body.extend_from_slice(text.as_bytes()),
                DataPart::File { path, binary } => {
                    let bytes = files.read(path)?;
                    if *binary {
                        body.extend_from_slice(&bytes);
                    } else {
                        body.extend(bytes.iter().filter(|b| **b != b'\r' && **b != b'\n'));
                    }
                }
            }
        }
        Ok(body)
    }

    /// Assembles a request against `client`.
    ///
    /// # Errors
    ///
    /// Returns an error when any part of the command is invalid.
    pub fn to_request(&self, client: &Client, files: &BodyFiles) -> AppResult<Request> {
        let method = self.resolve_method()?;
        let url = self.resolve_url(files)?;
        let mut builder = client.request(method, url);

        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }

        if let Some(user) = self.user.as_deref() {
            builder = match user.split_once(':') {
                Some((name, password)) => builder.basic_auth(name, Some(password)),
                None => builder.basic_auth(user, None::<&str>),
            };
        }

        if !self.data.is_empty() && !self.get {
            if self.json {
                if !self.has_header("content-type") {
                    builder = builder.header("Content-Type", JSON_CONTENT_TYPE);
                }
                if !self.has_header("accept") {
                    builder = builder.header("Accept", JSON_CONTENT_TYPE);
                }
            } else if !self.has_header("content-type") {
                builder = builder.header("Content-Type", FORM_CONTENT_TYPE);
            }
            builder = builder.body(self.payload(files)?);
        }

        if let Some(max_time) = self.max_time {
            builder = builder.timeout(max_time);
        }

        builder
            .build()
            .map_err(|err| AppError::descriptor(DescriptorError::Build { source: err }))
    }
}
