//! GraphML export of persons and their parent/spouse links

use crate::dataset::FamilyDataset;
use crate::resolver::Relationships;

const KEYS: [(&str, &str, &str, &str); 9] = [
    ("d0", "node", "birth", "int"),
    ("d1", "node", "death", "int"),
    ("d2", "node", "gender", "string"),
    ("d3", "node", "location", "string"),
    ("d4", "node", "occupation", "string"),
    ("d5", "node", "generation", "int"),
    ("d6", "node", "highlight", "boolean"),
    ("d7", "node", "notes", "string"),
    ("d8", "edge", "type", "string"),
];

/// Render the dataset as a directed GraphML document.
///
/// Each distinct name becomes one node; edges run parent to child, plus one
/// `spouse` edge per resolvable pair.
pub fn export(dataset: &FamilyDataset, relationships: &Relationships, graph_id: &str) -> String {
    let mut xml = String::new();

    xml.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<graphml xmlns="http://graphml.graphdrawing.org/xmlns"
         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
         xsi:schemaLocation="http://graphml.graphdrawing.org/xmlns
         http://graphml.graphdrawing.org/xmlns/1.0/graphml.xsd">
"#,
    );
    for (id, target, name, kind) in KEYS {
        xml.push_str(&format!(
            "  <key id=\"{}\" for=\"{}\" attr.name=\"{}\" attr.type=\"{}\"/>\n",
            id, target, name, kind
        ));
    }

    xml.push_str(&format!(
        "  <graph id=\"{}\" edgedefault=\"directed\">\n",
        xml_escape(graph_id)
    ));

    let mut edges = Vec::new();
    for (i, record) in dataset.iter().enumerate() {
        if relationships.index_of(&record.name) != Some(i) {
            continue;
        }

        xml.push_str(&format!("    <node id=\"{}\">\n", xml_escape(&record.name)));
        let mut data = |key: &str, value: String| {
            if !value.is_empty() {
                xml.push_str(&format!(
                    "      <data key=\"{}\">{}</data>\n",
                    key,
                    xml_escape(&value)
                ));
            }
        };
        data("d0", record.birth.known().map(|y| y.to_string()).unwrap_or_default());
        data("d1", record.death.known().map(|y| y.to_string()).unwrap_or_default());
        data("d2", record.gender.as_str().to_string());
        data("d3", record.location.clone());
        data("d4", record.occupation.clone());
        data("d5", record.generation.map(|g| g.to_string()).unwrap_or_default());
        data("d6", record.highlight.to_string());
        data("d7", record.notes.clone());
        xml.push_str("    </node>\n");

        if let Some(parent) = relationships.parent_index(i) {
            edges.push((dataset.records()[parent].name.clone(), record.name.clone(), "parent"));
        }
    }

    for (a, b) in relationships.spouse_pairs() {
        edges.push((a, b, "spouse"));
    }

    for (i, (source, target, kind)) in edges.iter().enumerate() {
        xml.push_str(&format!(
            "    <edge id=\"e{}\" source=\"{}\" target=\"{}\">\n      <data key=\"d8\">{}</data>\n    </edge>\n",
            i,
            xml_escape(source),
            xml_escape(target),
            kind
        ));
    }

    xml.push_str("  </graph>\n");
    xml.push_str("</graphml>\n");
    xml
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::person::PersonRecord;

    #[test]
    fn test_graphml_nodes_and_edges() {
        let dataset = FamilyDataset::from_records(vec![
            PersonRecord::new("Abe & Co").with_spouse("Sara").with_birth(1900),
            PersonRecord::new("Sara").with_spouse("Abe & Co"),
            PersonRecord::new("Isaac").with_parent("Abe & Co"),
        ]);
        let xml = export(&dataset, &dataset.relationships(), "asher");

        assert!(xml.contains("<graph id=\"asher\" edgedefault=\"directed\">"));
        assert!(xml.contains("<node id=\"Abe &amp; Co\">"));
        assert!(xml.contains("<data key=\"d0\">1900</data>"));
        assert!(xml.contains(
            "<edge id=\"e0\" source=\"Abe &amp; Co\" target=\"Isaac\">\n      <data key=\"d8\">parent</data>"
        ));
        assert_eq!(xml.matches(">spouse</data>").count(), 1);
        assert!(xml.ends_with("</graphml>\n"));
    }
}
