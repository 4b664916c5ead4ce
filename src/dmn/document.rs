//! Decision-table document templates.
//!
//! The clause declarations, their fixed ids and the layout are the rule
//! engine's import contract and are reproduced byte for byte. Only the rule
//! ids vary between runs.

use crate::dmn::ids::IdSource;
use crate::dmn::rule::Rule;
use crate::domain::{RELATIONSHIP_STATUS_VALUES, Region};

/// Which decision table a document holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// HEM benchmark lookup: income band × area × status × dependants.
    Benchmark,
    /// Postcode → area lookup.
    Postcode,
}

impl TableKind {
    pub fn display_name(self) -> &'static str {
        match self {
            TableKind::Benchmark => "HEM benchmark",
            TableKind::Postcode => "postcode area",
        }
    }

    fn rule_indent(self) -> usize {
        match self {
            TableKind::Benchmark => 7,
            TableKind::Postcode => 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionDocument {
    pub kind: TableKind,
    pub rules: Vec<Rule>,
}

impl DecisionDocument {
    pub fn new(kind: TableKind, rules: Vec<Rule>) -> Self {
        Self { kind, rules }
    }

    /// Serialize the table, drawing rule ids from `ids` in document order.
    pub fn render(&self, ids: &mut dyn IdSource) -> String {
        let indent = self.kind.rule_indent();
        let rules: String = self.rules.iter().map(|r| render_rule(r, indent, ids)).collect();
        match self.kind {
            TableKind::Benchmark => benchmark_table(&rules),
            TableKind::Postcode => postcode_table(&rules),
        }
    }
}

fn render_rule(rule: &Rule, indent: usize, ids: &mut dyn IdSource) -> String {
    let pad = " ".repeat(indent);
    let entry_pad = " ".repeat(indent + 2);
    let text_pad = " ".repeat(indent + 4);

    let mut out = format!("\n{pad}<rule id=\"DecisionRule_{}\">", ids.next_id());
    for input in &rule.inputs {
        out.push_str(&format!(
            "\n{entry_pad}<inputEntry id=\"UnaryTests_{}\">\n{text_pad}<text>{input}</text>\n{entry_pad}</inputEntry>",
            ids.next_id()
        ));
    }
    out.push_str(&format!(
        "\n{entry_pad}<outputEntry id=\"LiteralExpression_{}\">\n{text_pad}<text>{}</text>\n{entry_pad}</outputEntry>",
        ids.next_id(),
        rule.output
    ));
    out.push_str(&format!("\n{pad}</rule>"));
    out
}

fn benchmark_table(rules: &str) -> String {
    let areas = Region::quoted_value_list();
    let statuses = RELATIONSHIP_STATUS_VALUES
        .iter()
        .map(|s| format!("\"{s}\""))
        .collect::<Vec<_>>()
        .join(",");
    format!(
        r#"
  <decisionTable id="DecisionTable_06kpvxy">
    <input id="InputClause_0egegar" label="Final annual income">
      <inputExpression id="LiteralExpression_0pugzmw" typeRef="number">
        <text>finalVerifiedIncome*12</text>
      </inputExpression>
    </input>
    <input id="InputClause_0hnzzvq" label="Area">
      <inputExpression id="LiteralExpression_1h9ydsz" typeRef="string">
        <text>area</text>
      </inputExpression>
      <inputValues id="UnaryTests_1brduns">
        <text>{areas}</text>
      </inputValues>
    </input>
    <input id="InputClause_0aobuo4" label="Relationship Status">
      <inputExpression id="LiteralExpression_136rm4m" typeRef="string">
        <text>lower case(user.relationshipStatus)</text>
      </inputExpression>
      <inputValues id="UnaryTests_0edpfbt">
        <text>{statuses}</text>
      </inputValues>
    </input>
    <input id="InputClause_03n0vvq" label="Number of dependants">
      <inputExpression id="LiteralExpression_1u2hd8x" typeRef="number">
        <text>user.numberOfDependants</text>
      </inputExpression>
    </input>
    <output id="OutputClause_0zwsw2e" label="Benchmark Value" name="benchmarkValue" typeRef="string" />
     {rules}
    </decisionTable>"#
    )
}

fn postcode_table(rules: &str) -> String {
    let areas = Region::quoted_value_list();
    format!(
        r#"
    <decisionTable id="DecisionTable_11zy1qw">
    <input id="InputClause_1bk8nbq" label="Postcode">
      <inputExpression id="LiteralExpression_02fyz15" typeRef="string">
        <text>postcode</text>
      </inputExpression>
    </input>
    <output id="OutputClause_1mao4zs" label="Area" name="area" typeRef="string">
      <outputValues id="UnaryTests_1dpmk2w">
        <text>{areas}</text>
      </outputValues>
    </output>
      {rules}
    </decisionTable>
  "#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dmn::ids::SequentialIds;

    #[test]
    fn postcode_document_layout() {
        let doc = DecisionDocument::new(
            TableKind::Postcode,
            vec![Rule {
                inputs: vec!["\"2000\"".into()],
                output: "\"Sydney\"".into(),
            }],
        );
        let xml = doc.render(&mut SequentialIds::new());

        let expected_rule = "\n      <rule id=\"DecisionRule_0000000\">\n        <inputEntry id=\"UnaryTests_0000001\">\n          <text>\"2000\"</text>\n        </inputEntry>\n        <outputEntry id=\"LiteralExpression_0000002\">\n          <text>\"Sydney\"</text>\n        </outputEntry>\n      </rule>";
        assert!(xml.starts_with("\n    <decisionTable id=\"DecisionTable_11zy1qw\">\n"));
        assert!(xml.contains(&format!("    </output>\n      {expected_rule}\n    </decisionTable>\n  ")));
        assert!(xml.ends_with("</decisionTable>\n  "));
    }

    #[test]
    fn benchmark_document_declares_clauses_and_rules() {
        let doc = DecisionDocument::new(
            TableKind::Benchmark,
            vec![Rule {
                inputs: vec![
                    "&gt;=630000".into(),
                    "\"Perth\"".into(),
                    "\"single\", \"divorced\", \"separated\", \"widowed\"".into(),
                    "0".into(),
                ],
                output: "12.00".into(),
            }],
        );
        let xml = doc.render(&mut SequentialIds::new());

        assert!(xml.starts_with("\n  <decisionTable id=\"DecisionTable_06kpvxy\">\n"));
        assert!(xml.contains(
            "<text>\"single\",\"married\",\"de_facto\",\"divorced\",\"separated\",\"widowed\"</text>"
        ));
        assert!(xml.contains(
            "typeRef=\"string\" />\n     \n       <rule id=\"DecisionRule_0000000\">\n         <inputEntry id=\"UnaryTests_0000001\">\n           <text>&gt;=630000</text>\n         </inputEntry>"
        ));
        assert!(xml.contains(
            "\n         <outputEntry id=\"LiteralExpression_0000005\">\n           <text>12.00</text>\n         </outputEntry>\n       </rule>\n    </decisionTable>"
        ));
        assert_eq!(xml.matches("<inputEntry ").count(), 4);
    }

    #[test]
    fn empty_table_still_renders_clauses() {
        let doc = DecisionDocument::new(TableKind::Postcode, Vec::new());
        let xml = doc.render(&mut SequentialIds::new());
        assert!(xml.contains("<output id=\"OutputClause_1mao4zs\" label=\"Area\" name=\"area\" typeRef=\"string\">"));
        assert!(!xml.contains("<rule "));
    }
}
