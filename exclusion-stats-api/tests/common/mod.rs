//! Policy document fixtures shared by the API test suites

#![allow(dead_code)]

/// Exclusion counts to render into a policy document
#[derive(Debug, Clone, Copy, Default)]
pub struct Exclusions {
    pub path: usize,
    pub extension: usize,
    pub wildcard: usize,
    pub file_scan: usize,
    pub system_protection: usize,
    pub malicious_activity: usize,
}

pub const BUILT_IN_MAC: Exclusions = Exclusions {
    path: 6,
    extension: 0,
    wildcard: 2,
    file_scan: 2,
    system_protection: 0,
    malicious_activity: 0,
};

pub const NAME_STANDARD: Exclusions = Exclusions {
    path: 152,
    extension: 28,
    wildcard: 96,
    file_scan: 84,
    system_protection: 24,
    malicious_activity: 2,
};

/// Render a signed policy document holding the requested exclusions
pub fn policy_xml(exclusions: &Exclusions) -> String {
    let mut info = String::new();
    let file_items = [
        (2, exclusions.path),
        (3, exclusions.extension),
        (6, exclusions.wildcard),
    ];
    for (code, count) in file_items {
        for i in 0..count {
            info.push_str(&format!("<item>1|{}|0||C:\\excluded\\{}-{}</item>", code, code, i));
        }
    }

    let mut process = String::new();
    let process_items = [
        (1, exclusions.file_scan),
        (4, exclusions.system_protection),
        (16, exclusions.malicious_activity),
    ];
    for (flags, count) in process_items {
        for i in 0..count {
            process.push_str(&format!(
                "<item>1|0||C:\\Program Files\\app{}-{}.exe|{}</item>",
                flags, i, flags
            ));
        }
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Signature xmlns="http://www.w3.org/2000/09/xmldsig#">
  <Object Id="ampconfig">
    <config>
      <exclusions>
        <info>{}</info>
        <process>{}</process>
      </exclusions>
    </config>
  </Object>
</Signature>"#,
        info, process
    )
}
