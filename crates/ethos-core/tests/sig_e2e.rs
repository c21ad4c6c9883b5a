//! End-to-end pipeline test: transcript -> graph -> sign -> verify ->
//! tamper detection, exercising the stored-artifact path the CLI uses.

use chrono::{TimeZone, Utc};
use ethos_core::checks::HeuristicScorer;
use ethos_core::crypto::keys::Keypair;
use ethos_core::crypto::sign::{SignatureDocument, VerificationOutcome, sign_graph, verify_graph};
use ethos_core::graph::GraphBuilder;
use ethos_core::transcript::parse_transcript;
use serde_json::{Value, json};

const TRANSCRIPT: &str = concat!(
    "{\"type\":\"event\",\"role\":\"user\",\"ts\":\"2026-01-01T00:00:00Z\"}\n",
    "{\"type\":\"tool_call\",\"tool_name\":\"shell\",\"payload\":{\"cmd\":\"ls\"},",
    "\"ts\":\"2026-01-01T00:00:01Z\"}\n",
);

fn build_graph_value() -> Value {
    let events = parse_transcript(TRANSCRIPT).expect("parse transcript");
    let builder = GraphBuilder::new(
        "agent-1",
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single().expect("timestamp"),
    );
    let built = builder
        .build(&events, &HeuristicScorer::default(), 0.8)
        .expect("build graph");

    built.graph.validate().expect("graph invariants");
    built.graph.to_value().expect("graph to value")
}

#[test]
fn two_event_transcript_builds_the_expected_chain() {
    let graph = build_graph_value();

    let nodes = graph["nodes"].as_array().expect("nodes");
    let edges = graph["edges"].as_array().expect("edges");
    assert_eq!(nodes.len(), 2);
    assert_eq!(edges.len(), 1);
    assert_eq!(nodes[0]["id"], "n1");
    assert_eq!(nodes[1]["id"], "n2");
    assert_eq!(edges[0], json!({"from": "n1", "to": "n2", "relation": "follows"}));
    assert_eq!(nodes[1]["metadata"]["tool_name"], "shell");
}

#[test]
fn sign_then_verify_the_stored_artifact() {
    let graph = build_graph_value();
    let keypair = Keypair::generate();

    let dir = tempfile::tempdir().expect("temp dir");
    let graph_path = dir.path().join("sig.graph.json");
    let sig_path = dir.path().join("sig.sig.json");
    let private_path = dir.path().join("sig.key");
    let public_path = dir.path().join("sig.pub");

    keypair.persist(&private_path, &public_path).expect("persist keys");

    // Store pretty-printed, as the run command does; formatting must not
    // matter for verification.
    std::fs::write(
        &graph_path,
        serde_json::to_string_pretty(&graph).expect("pretty"),
    )
    .expect("write graph");

    let signing_key = Keypair::load_signing_key(&private_path).expect("load private");
    let stored: Value = serde_json::from_str(
        &std::fs::read_to_string(&graph_path).expect("read graph"),
    )
    .expect("parse graph");
    let document = sign_graph(&stored, &signing_key).expect("sign");
    document.write_to(&sig_path, false).expect("write signature");

    let verifying_key = Keypair::load_verifying_key(&public_path).expect("load public");
    let reloaded_doc = SignatureDocument::from_file(&sig_path).expect("reload signature");
    let reloaded_graph: Value = serde_json::from_str(
        &std::fs::read_to_string(&graph_path).expect("read graph"),
    )
    .expect("parse graph");

    let outcome =
        verify_graph(&reloaded_doc, &reloaded_graph, &verifying_key).expect("verify");
    assert!(outcome.is_verified());
}

#[test]
fn mutating_the_stored_graph_fails_with_hash_mismatch() {
    let graph = build_graph_value();
    let keypair = Keypair::generate();
    let document = sign_graph(&graph, keypair.signing_key()).expect("sign");

    let mut tampered = graph;
    tampered["nodes"][1]["content_hash"] = json!("0000");

    let outcome =
        verify_graph(&document, &tampered, &keypair.verifying_key()).expect("verify");
    assert_eq!(outcome.reason(), "graph hash mismatch");
    assert!(matches!(outcome, VerificationOutcome::HashMismatch { .. }));
}

#[test]
fn removing_a_node_fails_with_hash_mismatch() {
    let graph = build_graph_value();
    let keypair = Keypair::generate();
    let document = sign_graph(&graph, keypair.signing_key()).expect("sign");

    let mut tampered = graph;
    tampered["nodes"]
        .as_array_mut()
        .expect("nodes")
        .pop();

    let outcome =
        verify_graph(&document, &tampered, &keypair.verifying_key()).expect("verify");
    assert!(matches!(outcome, VerificationOutcome::HashMismatch { .. }));
}

#[test]
fn unmodified_graph_with_wrong_key_fails_with_signature_reason() {
    let graph = build_graph_value();
    let signer = Keypair::generate();
    let stranger = Keypair::generate();

    let document = sign_graph(&graph, signer.signing_key()).expect("sign");
    let outcome = verify_graph(&document, &graph, &stranger.verifying_key()).expect("verify");
    assert_eq!(outcome.reason(), "signature verification failed");
}
