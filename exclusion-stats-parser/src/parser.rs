//! Policy document parser

use exclusion_stats_core::PolicyExclusionCount;
use roxmltree::Document;

use crate::classifier::{classify, is_exclusion_item};
use crate::ParserError;

/// Parse one policy document and count its exclusions.
///
/// Every exclusion item under any `exclusions` section is visited exactly
/// once, however deeply the section groups them. Items the classifier does
/// not recognise are skipped.
pub fn parse_policy(
    policy_name: &str,
    xml_document: &[u8],
) -> Result<PolicyExclusionCount, ParserError> {
    let text = std::str::from_utf8(xml_document).map_err(|e| ParserError::MalformedDocument {
        policy_name: policy_name.to_string(),
        reason: format!("invalid UTF-8: {}", e),
    })?;

    let doc = Document::parse(text).map_err(|e| ParserError::MalformedDocument {
        policy_name: policy_name.to_string(),
        reason: e.to_string(),
    })?;

    let mut counts = PolicyExclusionCount::new(policy_name);
    let mut unclassified = 0usize;

    for node in doc.descendants().filter(|n| is_exclusion_item(*n)) {
        match classify(node) {
            Some(rule) => counts.record(&rule),
            None => unclassified += 1,
        }
    }

    tracing::debug!(
        "Parsed policy '{}': {} file, {} process, {} child-process exclusions ({} ignored)",
        policy_name,
        counts.total_file_exclusions(),
        counts.total_process_exclusions(),
        counts.child_process_count,
        unclassified
    );

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Signature xmlns="http://www.w3.org/2000/09/xmldsig#">
  <Object Id="ampconfig">
    <config>
      <exclusions>
        <info>
          <item>1|2|0||C:\Windows\Temp</item>
          <item>1|3|0||log</item>
          <item>1|6|0||C:\*\cache</item>
          <item>1|1|0||Win.Trojan.Test</item>
        </info>
        <process>
          <item>1|0||C:\app.exe|1</item>
          <item>1|0||C:\svc.exe|12</item>
          <item>1|0||C:\agent.exe|16</item>
          <item>1|0||C:\self.exe|64</item>
        </process>
      </exclusions>
    </config>
  </Object>
</Signature>"#;

    #[test]
    fn test_parse_counts_all_categories() {
        let counts = parse_policy("Standard", POLICY.as_bytes()).unwrap();
        assert_eq!(counts.policy_name, "Standard");
        assert_eq!(counts.path_count, 1);
        assert_eq!(counts.file_extension_count, 1);
        assert_eq!(counts.wildcard_count, 1);
        assert_eq!(counts.file_scan_count, 1);
        assert_eq!(counts.system_protection_count, 1);
        assert_eq!(counts.malicious_activity_count, 1);
        assert_eq!(counts.child_process_count, 2);
        assert_eq!(counts.total_file_exclusions(), 3);
        assert_eq!(counts.total_process_exclusions(), 3);
    }

    #[test]
    fn test_policy_without_exclusions() {
        let counts = parse_policy("Empty", b"<config><scan>on</scan></config>").unwrap();
        assert!(counts.is_empty());
        assert_eq!(counts.child_process_count, 0);

        let counts = parse_policy("Bare", b"<config><exclusions/></config>").unwrap();
        assert!(counts.is_empty());
    }

    #[test]
    fn test_nested_groupings_are_counted_once() {
        let xml = r#"<config>
          <exclusions>
            <windows><info><item>1|2|||C:\a</item></info></windows>
            <exclusions>
              <mac><info><item>1|2|||/tmp</item><item>1|6|||/var/*</item></info></mac>
              <process><item>1|0||/bin/x|0</item></process>
            </exclusions>
          </exclusions>
        </config>"#;
        let counts = parse_policy("Nested", xml.as_bytes()).unwrap();
        assert_eq!(counts.path_count, 2);
        assert_eq!(counts.wildcard_count, 1);
        assert_eq!(counts.file_scan_count, 1);
    }

    #[test]
    fn test_combined_process_flags() {
        let xml = r#"<exclusions><process>
            <item>1|0||C:\writer.exe|3</item>
            <item>1|0||C:\both.exe|20</item>
        </process></exclusions>"#;
        let counts = parse_policy("Flags", xml.as_bytes()).unwrap();
        assert_eq!(counts.file_scan_count, 0);
        assert_eq!(counts.system_protection_count, 1);
        assert_eq!(counts.malicious_activity_count, 0);
        assert_eq!(counts.child_process_count, 0);
    }

    #[test]
    fn test_item_order_does_not_matter() {
        let forward = r#"<exclusions><info><item>1|2|||a</item><item>1|3|||b</item></info>
            <process><item>1|0||p|4</item></process></exclusions>"#;
        let reversed = r#"<exclusions><process><item>1|0||p|4</item></process>
            <info><item>1|3|||b</item><item>1|2|||a</item></info></exclusions>"#;
        assert_eq!(
            parse_policy("p", forward.as_bytes()).unwrap(),
            parse_policy("p", reversed.as_bytes()).unwrap()
        );
    }

    #[test]
    fn test_malformed_document() {
        let err = parse_policy("Broken", b"<config><exclusions></config>").unwrap_err();
        assert!(matches!(
            err,
            ParserError::MalformedDocument { ref policy_name, .. } if policy_name == "Broken"
        ));
    }

    #[test]
    fn test_invalid_utf8() {
        let err = parse_policy("Binary", &[0x3c, 0xff, 0xfe, 0x3e]).unwrap_err();
        assert!(err.to_string().contains("invalid UTF-8"));
    }
}
