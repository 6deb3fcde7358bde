use std::path::PathBuf;
use std::time::Duration;

use crate::error::DescriptorError;

use super::lexer::split_words;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CurlOption {
    Request,
    Header,
    Data,
    DataRaw,
    DataBinary,
    DataUrlEncode,
    Json,
    User,
    UserAgent,
    Referer,
    Cookie,
    Head,
    Get,
    Url,
    MaxTime,
    IgnoredFlag,
    IgnoredValue,
}

impl CurlOption {
    const fn takes_value(self) -> bool {
        !matches!(
            self,
            CurlOption::Head | CurlOption::Get | CurlOption::IgnoredFlag
        )
    }

    fn from_long(name: &str) -> Option<Self> {
        let option = match name {
            "request" => CurlOption::Request,
            "header" => CurlOption::Header,
            "data" | "data-ascii" => CurlOption::Data,
            "data-raw" => CurlOption::DataRaw,
            "data-binary" => CurlOption::DataBinary,
            "data-urlencode" => CurlOption::DataUrlEncode,
            "json" => CurlOption::Json,
            "user" => CurlOption::User,
            "user-agent" => CurlOption::UserAgent,
            "referer" => CurlOption::Referer,
            "cookie" => CurlOption::Cookie,
            "head" => CurlOption::Head,
            "get" => CurlOption::Get,
            "url" => CurlOption::Url,
            "max-time" => CurlOption::MaxTime,
            "silent" | "show-error" | "location" | "insecure" | "verbose" | "include"
            | "compressed" | "http1.0" | "http1.1" | "http2" | "http2-prior-knowledge"
            | "fail" | "no-buffer" | "globoff" | "progress-bar" | "no-keepalive"
            | "tcp-nodelay" | "path-as-is" | "raw" | "no-progress-meter" => {
                CurlOption::IgnoredFlag
            }
            "output" | "connect-timeout" | "retry" | "retry-delay" | "max-redirs"
            | "write-out" | "cacert" | "cert" | "key" | "proxy" | "resolve" | "connect-to"
            | "limit-rate" | "cookie-jar" | "dump-header" | "interface" | "keepalive-time" => {
                CurlOption::IgnoredValue
            }
            _ => return None,
        };
        Some(option)
    }

    const fn from_short(flag: char) -> Option<Self> {
        let option = match flag {
            'X' => CurlOption::Request,
            'H' => CurlOption::Header,
            'd' => CurlOption::Data,
            'u' => CurlOption::User,
            'A' => CurlOption::UserAgent,
            'e' => CurlOption::Referer,
            'b' => CurlOption::Cookie,
            'I' => CurlOption::Head,
            'G' => CurlOption::Get,
            'm' => CurlOption::MaxTime,
            's' | 'S' | 'L' | 'k' | 'v' | 'i' | 'f' | 'g' | 'N' | '#' => CurlOption::IgnoredFlag,
            'o' | 'w' | 'x' | 'c' | 'D' => CurlOption::IgnoredValue,
            _ => return None,
        };
        Some(option)
    }
}

/// One `-d`-style payload fragment; fragments are joined with `&`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataPart {
    Text(String),
    /// `@path`; newlines are stripped unless the file is sent as binary.
    File { path: PathBuf, binary: bool },
}

/// A parsed curl command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurlCommand {
    pub method: Option<String>,
    pub url: Option<String>,
    pub headers: Vec<(String, String)>,
    pub data: Vec<DataPart>,
    pub json: bool,
    pub user: Option<String>,
    pub head: bool,
    pub get: bool,
    pub max_time: Option<Duration>,
}

impl CurlCommand {
    /// Parses a curl command line; the leading `curl` word is optional.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed quoting, unknown options or options
    /// missing their value.
    pub fn parse(descriptor: &str) -> Result<Self, DescriptorError> {
        let words = split_words(descriptor)?;
        let mut words = words.into_iter().peekable();
        if words.peek().is_none() {
            return Err(DescriptorError::Empty);
        }
        if words.peek().map(String::as_str) == Some("curl") {
            words.next();
        }

        let mut command = Self::default();
        while let Some(word) = words.next() {
            if word == "--" {
                for positional in words.by_ref() {
                    command.set_positional(positional);
                }
                break;
            }

            if let Some(long) = word.strip_prefix("--") {
                let (name, inline) = match long.split_once('=') {
                    Some((name, value)) => (name, Some(value.to_owned())),
                    None => (long, None),
                };
                let option =
                    CurlOption::from_long(name).ok_or_else(|| DescriptorError::UnknownOption {
                        option: word.clone(),
                    })?;
                let value = if option.takes_value() {
                    match inline {
                        Some(value) => Some(value),
                        None => Some(words.next().ok_or_else(|| {
                            DescriptorError::MissingValue {
                                option: word.clone(),
                            }
                        })?),
                    }
                } else {
                    None
                };
                command.apply(option, value)?;
                continue;
            }

            if let Some(cluster) = word.strip_prefix('-').filter(|rest| !rest.is_empty()) {
                for (pos, flag) in cluster.char_indices() {
                    let option = CurlOption::from_short(flag).ok_or_else(|| {
                        DescriptorError::UnknownOption {
                            option: format!("-{}", flag),
                        }
                    })?;
                    if !option.takes_value() {
                        command.apply(option, None)?;
                        continue;
                    }
                    let attached = cluster
                        .get(pos.saturating_add(flag.len_utf8())..)
                        .unwrap_or_default();
                    let value = if attached.is_empty() {
                        words
                            .next()
                            .ok_or_else(|| DescriptorError::MissingValue {
                                option: format!("-{}", flag),
                            })?
                    } else {
                        attached.to_owned()
                    };
                    command.apply(option, Some(value))?;
                    break;
                }
                continue;
            }

            command.set_positional(word);
        }

        Ok(command)
    }

    fn set_positional(&mut self, word: String) {
        if self.url.is_none() {
            self.url = Some(word);
        }
    }

    fn apply(&mut self, option: CurlOption, value: Option<String>) -> Result<(), DescriptorError> {
        let value = value.unwrap_or_default();
        match option {
            CurlOption::Request => self.method = Some(value),
            CurlOption::Header => self.headers.push(parse_header(&value)?),
            CurlOption::Data => self.data.push(data_part(value, false)),
            CurlOption::DataRaw => self.data.push(DataPart::Text(value)),
            CurlOption::DataBinary => self.data.push(data_part(value, true)),
            CurlOption::DataUrlEncode => self.data.push(DataPart::Text(url_encode_data(&value))),
            CurlOption::Json => {
                self.json = true;
                self.data.push(data_part(value, true));
            }
            CurlOption::User => self.user = Some(value),
            CurlOption::UserAgent => self.headers.push(("User-Agent".to_owned(), value)),
            CurlOption::Referer => self.headers.push(("Referer".to_owned(), value)),
            CurlOption::Cookie => self.headers.push(("Cookie".to_owned(), value)),
            CurlOption::Head => self.head = true,
            CurlOption::Get => self.get = true,
            CurlOption::Url => self.url = Some(value),
            CurlOption::MaxTime => self.max_time = Some(parse_max_time(&value)?),
            CurlOption::IgnoredFlag | CurlOption::IgnoredValue => {}
        }
        Ok(())
    }

    pub(super) fn has_header(&self, name: &str) -> bool {
        self.headers
            .iter()
            .any(|(key, _)| key.eq_ignore_ascii_case(name))
    }
}

fn parse_header(value: &str) -> Result<(String, String), DescriptorError> {
    match value.split_once(':') {
        Some((key, header_value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_owned(), header_value.trim().to_owned()))
        }
        Some(_) | None => Err(DescriptorError::InvalidHeader {
            value: value.to_owned(),
        }),
    }
}

fn data_part(value: String, binary: bool) -> DataPart {
    match value.strip_prefix('@') {
        Some(path) => DataPart::File {
            path: PathBuf::from(path),
            binary,
        },
        None => DataPart::Text(value),
    }
}

fn url_encode_data(value: &str) -> String {
    let (name, content) = match value.split_once('=') {
        Some((name, content)) => (name, content),
        None => ("", value),
    };
    let encoded: String = url::form_urlencoded::byte_serialize(content.as_bytes()).collect();
    if name.is_empty() {
        encoded
    } else {
        format!("{}={}", name, encoded)
    }
}

fn parse_max_time(value: &str) -> Result<Duration, DescriptorError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .filter(|duration| !duration.is_zero())
        .ok_or_else(|| DescriptorError::InvalidMaxTime {
            value: value.to_owned(),
        })
}
