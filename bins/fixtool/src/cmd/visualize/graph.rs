use fixture::{calldata::Payload, units::format_tokens, Address, FixtureUnit, U256};
use log::{debug, warn};
use petgraph::{
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};
use std::{collections::HashMap, fmt, fmt::Write};

/// Hex characters of an address kept in node labels.
pub const TRUNCATE: usize = 6;

/// Amount minted by the benchmark token's `mint()`.
const MINT_AMOUNT: &str = "1000000";

/// `0x` followed by the first [`TRUNCATE`] hex characters of `address`.
pub fn short_address(address: &Address) -> String {
    let mut full = format!("{address:#x}");
    full.truncate(2 + TRUNCATE);
    full
}

/// An account in the flow graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowNode {
    /// Truncated address.
    pub label: String,
    /// Formatted pre-state balance. `None` for accounts that only appear as
    /// token receivers.
    pub balance: Option<String>,
}

impl fmt::Display for FlowNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.balance {
            Some(balance) => write!(f, "{}\n({balance}e)", self.label),
            None => f.write_str(&self.label),
        }
    }
}

/// What moved along an edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Amount {
    /// Native value in wei.
    Ether(U256),
    /// ERC20 `transfer` amount in token base units.
    Token(U256),
    /// Token `mint()` call.
    Mint,
}

/// A transaction in the flow graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowEdge {
    /// Position in the transaction list.
    pub index: usize,
    /// What was transferred.
    pub amount: Amount,
}

impl fmt::Display for FlowEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Tx:{}] ", self.index)?;
        match &self.amount {
            Amount::Ether(value) => write!(f, "{}e", format_tokens(*value)),
            Amount::Token(value) => write!(f, "{}u", format_tokens(*value)),
            Amount::Mint => write!(f, "mint {MINT_AMOUNT}u"),
        }
    }
}

/// Value flow between accounts of a fixture, one edge per recognised
/// transaction.
///
/// Nodes are keyed by their truncated label, so addresses sharing a prefix
/// collapse into one node.
#[derive(Clone, Debug, Default)]
pub struct FlowGraph {
    /// Accounts and transactions.
    pub graph: DiGraph<FlowNode, FlowEdge>,
    nodes: HashMap<String, NodeIndex>,
}

impl FlowGraph {
    /// Builds the graph of `unit`'s transactions in list order.
    pub fn from_unit(unit: &FixtureUnit) -> Self {
        let mut flow = Self::default();

        for (index, tx) in unit.transaction.iter().enumerate() {
            let sender = flow.declare(&tx.sender, unit.balance_of(&tx.sender));

            let (receiver, amount) = match Payload::classify(tx) {
                Payload::NativeTransfer { to: Some(to), value } => {
                    (flow.declare(&to, unit.balance_of(&to)), Amount::Ether(value))
                }
                Payload::NativeTransfer { to: None, .. } => {
                    warn!("[Tx:{index}] contract creation with value, not drawn");
                    continue;
                }
                Payload::TokenTransfer { to, amount } => (flow.reference(&to), Amount::Token(amount)),
                Payload::Mint => (sender, Amount::Mint),
                Payload::Unrecognized => {
                    debug!("[Tx:{index}] unrecognized payload, skipped");
                    continue;
                }
            };
            flow.graph.add_edge(sender, receiver, FlowEdge { index, amount });
        }

        flow
    }

    /// Adds a node with a balance unless one with the same label was declared
    /// before. A node that was only referenced gets its balance filled in.
    fn declare(&mut self, address: &Address, balance: U256) -> NodeIndex {
        let idx = self.reference(address);
        let node = &mut self.graph[idx];
        if node.balance.is_none() {
            node.balance = Some(format_tokens(balance));
        }
        idx
    }

    /// Returns the node for `address`, adding a bare one if needed.
    fn reference(&mut self, address: &Address) -> NodeIndex {
        let label = short_address(address);
        if let Some(idx) = self.nodes.get(&label) {
            return *idx;
        }
        let idx = self.graph.add_node(FlowNode {
            label: label.clone(),
            balance: None,
        });
        self.nodes.insert(label, idx);
        idx
    }

    /// Node with the given truncated label.
    pub fn node(&self, label: &str) -> Option<&FlowNode> {
        self.nodes.get(label).map(|idx| &self.graph[*idx])
    }

    /// Number of accounts drawn.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of transactions drawn.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Edge labels in transaction order.
    pub fn edge_labels(&self) -> Vec<String> {
        self.graph
            .edge_references()
            .map(|e| e.weight().to_string())
            .collect()
    }

    /// Graphviz description of the graph.
    pub fn to_dot(&self, comment: &str) -> String {
        let mut out = format!(
            "// {comment}\ndigraph {{\n\tratio=auto\n\tnode [fillcolor=lightblue shape=circle]\n"
        );

        for idx in self.graph.node_indices() {
            let node = &self.graph[idx];
            let _ = writeln!(
                out,
                "\t{} [label={}]",
                quote(&node.label),
                quote(&node.to_string())
            );
        }

        for e in self.graph.edge_references() {
            let _ = writeln!(
                out,
                "\t{} -> {} [label={}]",
                quote(&self.graph[e.source()].label),
                quote(&self.graph[e.target()].label),
                quote(&e.weight().to_string())
            );
        }

        out.push_str("}\n");
        out
    }
}

/// Quotes a DOT identifier; newlines become `\n` escapes.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixture::{
        calldata::{encode_transfer, MINT_SELECTOR},
        units::ONE_ETHER,
        AccountInfo, Bytes, FixtureTransaction,
    };
    use fixture::primitives::address;
    use std::collections::BTreeMap;

    const ALICE: Address = address!("a94f5374fce5edbc8e2a8697c15331677e6ebf0b");
    const BOB: Address = address!("1f9090aae28b8a3dceadf281b0f12828e676c326");
    const CAROL: Address = address!("c0ffee254729296a45a3885639ac7e10f9d54979");
    const TOKEN: Address = address!("b30df92bb107e6f1e46f7df4fd31a316ceb4e7d9");

    fn native(sender: Address, to: Address, value: u128) -> FixtureTransaction {
        FixtureTransaction {
            sender,
            to: Some(to),
            value: U256::from(value),
            ..Default::default()
        }
    }

    fn call(sender: Address, data: Bytes) -> FixtureTransaction {
        FixtureTransaction {
            sender,
            to: Some(TOKEN),
            data,
            ..Default::default()
        }
    }

    fn unit(transaction: Vec<FixtureTransaction>) -> FixtureUnit {
        FixtureUnit {
            info: None,
            env: None,
            pre: BTreeMap::from([
                (ALICE, AccountInfo::funded(U256::from(100 * ONE_ETHER))),
                (BOB, AccountInfo::funded(U256::from(5 * ONE_ETHER / 2))),
            ]),
            transaction,
            post: None,
        }
    }

    #[test]
    fn short_addresses() {
        assert_eq!(short_address(&ALICE), "0xa94f53");
        assert_eq!(short_address(&Address::ZERO), "0x000000");
    }

    #[test]
    fn native_transfers() {
        let flow = FlowGraph::from_unit(&unit(vec![
            native(ALICE, BOB, ONE_ETHER),
            native(BOB, CAROL, ONE_ETHER / 4),
        ]));

        assert_eq!(flow.node_count(), 3);
        assert_eq!(flow.edge_labels(), vec!["[Tx:0] 1.00e", "[Tx:1] 0.25e"]);
        assert_eq!(flow.node("0xa94f53").unwrap().to_string(), "0xa94f53\n(100.00e)");
        assert_eq!(flow.node("0x1f9090").unwrap().to_string(), "0x1f9090\n(2.50e)");
        // Not in the pre-state.
        assert_eq!(flow.node("0xc0ffee").unwrap().to_string(), "0xc0ffee\n(0.00e)");
    }

    #[test]
    fn token_transfer_references_receiver() {
        let flow = FlowGraph::from_unit(&unit(vec![call(
            ALICE,
            encode_transfer(BOB, U256::from(ONE_ETHER)),
        )]));

        assert_eq!(flow.edge_labels(), vec!["[Tx:0] 1.00u"]);
        assert_eq!(flow.node("0x1f9090").unwrap().balance, None);
        assert_eq!(flow.node("0x1f9090").unwrap().to_string(), "0x1f9090");
    }

    #[test]
    fn later_declaration_fills_in_balance() {
        let flow = FlowGraph::from_unit(&unit(vec![
            call(ALICE, encode_transfer(BOB, U256::from(ONE_ETHER))),
            native(BOB, ALICE, ONE_ETHER),
        ]));

        assert_eq!(flow.node_count(), 2);
        assert_eq!(flow.node("0x1f9090").unwrap().balance.as_deref(), Some("2.50"));
    }

    #[test]
    fn mint_is_a_self_loop() {
        let flow = FlowGraph::from_unit(&unit(vec![call(ALICE, MINT_SELECTOR.to_vec().into())]));

        assert_eq!(flow.node_count(), 1);
        assert_eq!(flow.edge_labels(), vec!["[Tx:0] mint 1000000u"]);
        let edge = flow.graph.edge_references().next().unwrap();
        assert_eq!(edge.source(), edge.target());
    }

    #[test]
    fn unrecognized_payloads_add_no_edges() {
        let flow = FlowGraph::from_unit(&unit(vec![
            call(ALICE, Bytes::new()),
            FixtureTransaction {
                sender: BOB,
                to: None,
                value: U256::from(ONE_ETHER),
                ..Default::default()
            },
            native(ALICE, CAROL, ONE_ETHER),
        ]));

        // Senders are drawn even when their transaction is not.
        assert_eq!(flow.node_count(), 3);
        assert_eq!(flow.edge_labels(), vec!["[Tx:2] 1.00e"]);
    }

    #[test]
    fn dot_output() {
        let flow = FlowGraph::from_unit(&unit(vec![native(ALICE, BOB, ONE_ETHER)]));
        let dot = flow.to_dot("Transaction Flow");

        assert_eq!(
            dot,
            "// Transaction Flow\n\
             digraph {\n\
             \tratio=auto\n\
             \tnode [fillcolor=lightblue shape=circle]\n\
             \t\"0xa94f53\" [label=\"0xa94f53\\n(100.00e)\"]\n\
             \t\"0x1f9090\" [label=\"0x1f9090\\n(2.50e)\"]\n\
             \t\"0xa94f53\" -> \"0x1f9090\" [label=\"[Tx:0] 1.00e\"]\n\
             }\n"
        );
    }

    #[test]
    fn quoting() {
        assert_eq!(quote("a\"b\\c\nd"), "\"a\\\"b\\\\c\\nd\"");
    }
}
