//! `[scheme "://"] host [":" port]` parsing (spec §3 `DnsServerSpec`, §6
//! grammar). An empty scheme means udp. Unknown schemes are a programmer
//! error and fail fast from the factory, never at query time.

use crate::errors::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DnsScheme {
    Udp,
    Tcp,
    Tls,
    Https,
}

impl DnsScheme {
    fn default_port(self) -> Option<u16> {
        match self {
            DnsScheme::Udp | DnsScheme::Tcp => Some(53),
            DnsScheme::Tls => Some(853),
            // https carries its own default (e.g. :443) resolved by the transport.
            DnsScheme::Https => None,
        }
    }
}

/// A parsed [`DnsScheme`]/host/port triple. For `https` the original URL is
/// kept intact in `url` so the transport can use it verbatim (spec §6:
/// "https schemes keep the URL intact for the transport").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsServerSpec {
    pub scheme: DnsScheme,
    pub host: String,
    pub port: Option<u16>,
    pub url: String,
}

impl DnsServerSpec {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let (scheme_str, rest) = match raw.split_once("://") {
            Some((scheme, rest)) => (scheme, rest),
            None => ("", raw),
        };

        let scheme = match scheme_str {
            "" | "udp" => DnsScheme::Udp,
            "tcp" => DnsScheme::Tcp,
            "tls" => DnsScheme::Tls,
            "https" => DnsScheme::Https,
            other => {
                return Err(ConfigError::UnknownScheme {
                    spec: raw.to_string(),
                    scheme: other.to_string(),
                })
            }
        };

        if scheme == DnsScheme::Https {
            // The transport needs the whole URL (path, query) intact, not
            // just host:port.
            let url = if scheme_str.is_empty() {
                format!("https://{}", rest)
            } else {
                raw.to_string()
            };
            let host = rest.split(['/', ':']).next().unwrap_or(rest).to_string();
            if host.is_empty() {
                return Err(ConfigError::EmptyHost(raw.to_string()));
            }
            return Ok(Self {
                scheme,
                host,
                port: None,
                url,
            });
        }

        let (host, port) = match rest.rsplit_once(':') {
            // Guard against bare IPv6 literals like "::1" being split on
            // their internal colons; only treat the suffix as a port when
            // it parses as one and the host part is non-empty.
            Some((host, port_str)) if !host.is_empty() => match port_str.parse::<u16>() {
                Ok(port) => (host.to_string(), Some(port)),
                Err(_) => (rest.to_string(), None),
            },
            _ => (rest.to_string(), None),
        };

        if host.is_empty() {
            return Err(ConfigError::EmptyHost(raw.to_string()));
        }

        let port = port.or_else(|| scheme.default_port());
        Ok(Self {
            scheme,
            host: host.clone(),
            port,
            url: raw.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_udp_with_no_scheme() {
        let spec = DnsServerSpec::parse("1.1.1.1").unwrap();
        assert_eq!(spec.scheme, DnsScheme::Udp);
        assert_eq!(spec.host, "1.1.1.1");
        assert_eq!(spec.port, Some(53));
    }

    #[test]
    fn tls_defaults_to_853() {
        let spec = DnsServerSpec::parse("tls://1.1.1.1").unwrap();
        assert_eq!(spec.scheme, DnsScheme::Tls);
        assert_eq!(spec.port, Some(853));
    }

    #[test]
    fn explicit_port_overrides_default() {
        let spec = DnsServerSpec::parse("tcp://9.9.9.9:5353").unwrap();
        assert_eq!(spec.port, Some(5353));
    }

    #[test]
    fn https_keeps_url_intact() {
        let spec = DnsServerSpec::parse("https://1.1.1.1/dns-query").unwrap();
        assert_eq!(spec.scheme, DnsScheme::Https);
        assert_eq!(spec.host, "1.1.1.1");
        assert_eq!(spec.url, "https://1.1.1.1/dns-query");
    }

    #[test]
    fn unknown_scheme_is_an_error() {
        let err = DnsServerSpec::parse("quic://1.1.1.1").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownScheme { .. }));
    }
}
