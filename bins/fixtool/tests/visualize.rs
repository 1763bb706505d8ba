use clap::Parser;
use fixtool::cmd::visualize::{Cmd, Error};
use serde_json::json;
use std::fs;

const SENDER: &str = "0xa94f5374fce5edbc8e2a8697c15331677e6ebf0b";
const RECEIVER: &str = "0x2adc25665018aa1fe0e6bc666dac8fc2697ff9ba";
const TOKEN: &str = "0xb30df92bb107e6f1e46f7df4fd31a316ceb4e7d9";

fn fixture() -> serde_json::Value {
    let transfer = format!(
        "0xa9059cbb000000000000000000000000{}0000000000000000000000000000000000000000000000000de0b6b3a7640000",
        &RECEIVER[2..]
    );
    json!({
        "just-test": {
            "pre": {
                SENDER: { "balance": "0x056bc75e2d63100000", "code": "0x", "nonce": "0x00", "storage": {} },
                TOKEN: { "balance": "0x00", "code": "0x6080", "nonce": "0x00", "storage": {} }
            },
            "transaction": [
                {
                    "data": "0x",
                    "gasLimit": "0x0f4240",
                    "gasPrice": "0x0a",
                    "nonce": "0x00",
                    "secretKey": "0x45a915e4d060149eb4365960e6a7a45f334393093061116b197e3240065ff2d8",
                    "sender": SENDER,
                    "to": RECEIVER,
                    "value": "0x0de0b6b3a7640000"
                },
                {
                    "data": transfer,
                    "gasLimit": "0x0f4240",
                    "gasPrice": "0x0a",
                    "nonce": "0x01",
                    "secretKey": "0x45a915e4d060149eb4365960e6a7a45f334393093061116b197e3240065ff2d8",
                    "sender": SENDER,
                    "to": TOKEN,
                    "value": "0x00"
                },
                {
                    "data": "0x1249c58b",
                    "gasLimit": "0x0f4240",
                    "gasPrice": "0x0a",
                    "nonce": "0x02",
                    "secretKey": "0x45a915e4d060149eb4365960e6a7a45f334393093061116b197e3240065ff2d8",
                    "sender": SENDER,
                    "to": TOKEN,
                    "value": "0x00"
                }
            ]
        }
    })
}

#[test]
fn writes_dot_description() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("m2o-10k.erc20.json");
    fs::write(&source, fixture().to_string()).unwrap();
    let out_dir = dir.path().join("out");

    let cmd = Cmd::try_parse_from([
        "visualize",
        source.to_str().unwrap(),
        "-o",
        out_dir.to_str().unwrap(),
        "--dot-only",
    ])
    .unwrap();
    let written = cmd.visualize(&source).unwrap();
    assert_eq!(written, out_dir.join("m2o-10k"));

    let dot = fs::read_to_string(&written).unwrap();
    assert!(dot.starts_with("// Transaction Flow\ndigraph {\n"));
    assert!(dot.contains("\t\"0xa94f53\" [label=\"0xa94f53\\n(100.00e)\"]\n"));
    assert!(dot.contains("\t\"0x2adc25\" [label=\"0x2adc25\\n(0.00e)\"]\n"));
    assert!(dot.contains("\t\"0xa94f53\" -> \"0x2adc25\" [label=\"[Tx:0] 1.00e\"]\n"));
    assert!(dot.contains("\t\"0xa94f53\" -> \"0x2adc25\" [label=\"[Tx:1] 1.00u\"]\n"));
    assert!(dot.contains("\t\"0xa94f53\" -> \"0xa94f53\" [label=\"[Tx:2] mint 1000000u\"]\n"));
    // The token contract only receives calls and is not drawn.
    assert!(!dot.contains("0xb30df9"));
    assert!(dot.ends_with("}\n"));
}

#[test]
fn folders_are_searched() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("fixtures").join("nested");
    fs::create_dir_all(&nested).unwrap();
    fs::write(nested.join("a.json"), fixture().to_string()).unwrap();
    fs::write(nested.join("notes.txt"), "not a fixture").unwrap();
    let out_dir = dir.path().join("out");

    let cmd = Cmd::try_parse_from([
        "visualize",
        dir.path().join("fixtures").to_str().unwrap(),
        "-o",
        out_dir.to_str().unwrap(),
        "--dot-only",
    ])
    .unwrap();
    cmd.run().unwrap();
    assert!(out_dir.join("a").is_file());
}

#[test]
fn missing_path_and_unit() {
    let dir = tempfile::tempdir().unwrap();
    let cmd = Cmd::try_parse_from(["visualize", dir.path().join("missing.json").to_str().unwrap()])
        .unwrap();
    assert!(matches!(cmd.run(), Err(Error::InvalidPath(_))));

    let cmd = Cmd::try_parse_from(["visualize", dir.path().to_str().unwrap()]).unwrap();
    assert!(matches!(cmd.run(), Err(Error::NoJsonFiles(_))));

    let source = dir.path().join("fixture.json");
    fs::write(&source, fixture().to_string()).unwrap();
    let cmd = Cmd::try_parse_from([
        "visualize",
        source.to_str().unwrap(),
        "-n",
        "other-test",
        "--dot-only",
    ])
    .unwrap();
    assert!(matches!(cmd.visualize(&source), Err(Error::Fixture { .. })));
}

#[test]
fn partial_env_is_drawn() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("partial.json");
    let document = json!({
        "just-test": {
            "env": { "currentCoinbase": "0x2adc25665018aa1fe0e6bc666dac8fc2697ff9ba" },
            "pre": {},
            "transaction": [
                {
                    "data": "0x",
                    "sender": SENDER,
                    "to": RECEIVER,
                    "value": "0x0de0b6b3a7640000"
                }
            ]
        }
    });
    fs::write(&source, document.to_string()).unwrap();

    let cmd = Cmd::try_parse_from([
        "visualize",
        source.to_str().unwrap(),
        "-o",
        dir.path().join("out").to_str().unwrap(),
        "--dot-only",
    ])
    .unwrap();
    let dot = fs::read_to_string(cmd.visualize(&source).unwrap()).unwrap();
    assert!(dot.contains("\t\"0xa94f53\" [label=\"0xa94f53\\n(0.00e)\"]\n"));
    assert!(dot.contains("\t\"0xa94f53\" -> \"0x2adc25\" [label=\"[Tx:0] 1.00e\"]\n"));
}
