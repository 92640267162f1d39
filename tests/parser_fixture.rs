//! Parser projection of the fixture configuration.

use gateway_audit::parse;
use gateway_audit::snapshot::namespaces as ns;

mod common;

#[test]
fn test_service_scope() {
    let service = parse(&common::load_fixture("example1.json"));

    // sequential start, debug, strict REST off, TLS present but disabled,
    // echo, h2c, raw key files
    assert_eq!(service.flags, vec![7222]);
    assert_eq!(service.components.get(ns::SERVER_PLUGIN), Some(&vec![1 << 2]));
    assert_eq!(service.components.get(ns::OPENTELEMETRY), Some(&vec![1, 25, 1, 1, 1]));
    assert_eq!(service.components.get(ns::API_KEYS), Some(&vec![]));
    assert!(service.components.contains_key(ns::RATELIMIT_SERVICE));
}

#[test]
fn test_endpoint_scope() {
    let service = parse(&common::load_fixture("example1.json"));
    let flags: Vec<_> = service.endpoints.iter().map(|e| e.flags.clone()).collect();
    assert_eq!(
        flags,
        vec![
            vec![1, 0, 0, 70_000, 0, 0],
            vec![1, 1, 1, 3_000, 0b0111, 0],
            vec![1, 0, 0, 3_000, 0, 0],
        ]
    );

    let proxied = &service.endpoints[1];
    assert_eq!(proxied.components.get(ns::CLIENT_PLUGIN), Some(&vec![1]));
    assert_eq!(proxied.backends[0].flags, vec![2]);
    assert_eq!(proxied.backends[0].components.get(ns::BACKEND_HTTP_CLIENT), Some(&vec![3]));
    assert!(service.endpoints[2].backends.is_empty());
}

#[test]
fn test_agent_scope() {
    let service = parse(&common::load_fixture("example1.json"));
    assert_eq!(service.agents.len(), 10);
    for agent in &service.agents {
        assert_eq!(agent.flags, vec![2, 2, 3, 1_000]);
        assert_eq!(agent.backends.len(), 1);
        assert_eq!(agent.components.get("async/amqp"), Some(&vec![]));
    }
}

#[test]
fn test_parse_is_pure() {
    let config = common::load_fixture("example1.json");
    let before = config.clone();
    assert_eq!(parse(&config), parse(&config));
    assert_eq!(config, before);
}
