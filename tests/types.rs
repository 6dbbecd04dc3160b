// ABOUTME: Integration tests for type-safe identifiers and host addresses.
// ABOUTME: Tests parsing, validation, and serialization properties.

use dockhand::types::*;
use std::path::Path;

mod host_uri_tests {
    use super::*;

    #[test]
    fn parse_unix_socket() {
        let uri = HostUri::parse("unix:///var/run/docker.sock").unwrap();
        assert!(uri.is_unix());
        assert_eq!(uri.socket_path(), Some(Path::new("/var/run/docker.sock")));
        assert_eq!(uri.to_string(), "unix:///var/run/docker.sock");
    }

    #[test]
    fn parse_tcp_address() {
        let uri = HostUri::parse("tcp://192.168.99.100:2376").unwrap();
        assert!(uri.is_tcp());
        assert_eq!(uri.authority().as_deref(), Some("192.168.99.100:2376"));
    }

    #[test]
    fn parse_trims_whitespace() {
        assert!(HostUri::parse("  tcp://h:1  ").is_ok());
    }

    #[test]
    fn rejects_bad_addresses() {
        assert_eq!(HostUri::parse(""), Err(ParseHostUriError::Empty));
        assert!(matches!(
            HostUri::parse("http://example.com"),
            Err(ParseHostUriError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            HostUri::parse("unix://relative.sock"),
            Err(ParseHostUriError::RelativeSocketPath(_))
        ));
        assert!(matches!(
            HostUri::parse("tcp://example.com"),
            Err(ParseHostUriError::MissingPort(_))
        ));
        assert!(matches!(
            HostUri::parse("tcp://example.com:0"),
            Err(ParseHostUriError::InvalidPort(_))
        ));
        assert_eq!(HostUri::parse("tcp://:2376"), Err(ParseHostUriError::EmptyHost));
    }

    #[test]
    fn serde_uses_the_uri_string() {
        let uri: HostUri = serde_yaml::from_str("tcp://10.0.0.1:2375").unwrap();
        assert_eq!(serde_json::to_string(&uri).unwrap(), r#""tcp://10.0.0.1:2375""#);
    }
}

mod id_tests {
    use super::*;

    #[test]
    fn short_form_is_twelve_chars() {
        let id = ContainerId::new("4f66ad9a0b2e5b1c8c7d9e0f1a2b3c4d");
        assert_eq!(id.short(), "4f66ad9a0b2e");
        assert_eq!(ContainerId::new("abc").short(), "abc");
    }

    #[test]
    fn blank_ids_are_empty() {
        assert!(ContainerId::new("").is_empty());
        assert!(ContainerId::new("  ").is_empty());
        assert!(!NetworkId::new("net").is_empty());
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = NetworkId::new("net123");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""net123""#);
        let back: NetworkId = serde_json::from_str(r#""net123""#).unwrap();
        assert_eq!(back, id);
    }
}
