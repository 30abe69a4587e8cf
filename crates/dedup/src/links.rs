use serde::{Deserialize, Serialize};

use crate::model::Record;

/// Search-query link shape: `<base><name words>+<qualifier>+<qualifier>...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkTemplate {
    pub base: String,
    pub qualifiers: Vec<String>,
}

impl Default for LinkTemplate {
    fn default() -> Self {
        Self {
            base: "https://www.google.com/search?q=".into(),
            qualifiers: vec![
                "restaurant".into(),
                "hawaii".into(),
                "site:instagram.com".into(),
            ],
        }
    }
}

/// Build the search link for one business name. No request is made.
pub fn build_search_link(name: &str, template: &LinkTemplate) -> String {
    let mut query = name.split_whitespace().collect::<Vec<_>>().join("+");
    for q in &template.qualifiers {
        query.push('+');
        query.push_str(q);
    }
    format!("{}{}", template.base, query)
}

/// Overwrite every record's link. Returns the number of links generated.
pub fn generate_links(mut records: Vec<Record>, template: &LinkTemplate) -> (Vec<Record>, usize) {
    for record in &mut records {
        record.link = Some(build_search_link(&record.name, template));
    }
    let generated = records.len();
    (records, generated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_link_shape() {
        let link = build_search_link("Joe's  Diner", &LinkTemplate::default());
        assert_eq!(
            link,
            "https://www.google.com/search?q=Joe's+Diner+restaurant+hawaii+site:instagram.com"
        );
    }

    #[test]
    fn empty_name_keeps_qualifiers() {
        let link = build_search_link("   ", &LinkTemplate::default());
        assert_eq!(
            link,
            "https://www.google.com/search?q=+restaurant+hawaii+site:instagram.com"
        );
    }

    #[test]
    fn custom_template() {
        let template = LinkTemplate {
            base: "https://duckduckgo.com/?q=".into(),
            qualifiers: vec!["maui".into()],
        };
        assert_eq!(build_search_link("Poke Bar", &template), "https://duckduckgo.com/?q=Poke+Bar+maui");
    }

    #[test]
    fn generate_overwrites_existing_links() {
        let records = vec![
            Record::new("Poke Bar", "1").with_link("https://old.example"),
            Record::new("Da Kine", "2"),
        ];
        let (records, generated) = generate_links(records, &LinkTemplate::default());
        assert_eq!(generated, 2);
        assert!(records.iter().all(|r| r.link.as_deref().unwrap().contains("site:instagram.com")));
        assert!(records[0].link.as_deref().unwrap().contains("Poke+Bar"));
    }
}
