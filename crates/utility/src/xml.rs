use std::collections::BTreeMap;

use roxmltree::Node;

/// A value read out of a TransXChange-style document, normalised so that
/// callers never have to special-case "one element" against "many elements
/// with the same tag". Every element becomes a [`Value::Map`] of its
/// children, every repeated tag becomes a [`Value::List`], and text-only
/// leaves become [`Value::Text`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Map(BTreeMap<String, Value>),
    List(Vec<Value>),
}

impl Value {
    /// Parses an XML element and its descendants into a [`Value`] tree.
    ///
    /// Attributes are folded into the map under their own name, unprefixed;
    /// this mirrors the only place TransXChange uses attributes that this
    /// crate cares about (`id`, `SequenceNumber`, `CreationDateTime`, ...).
    pub fn from_node(node: Node) -> Self {
        let children: Vec<Node> = node
            .children()
            .filter(|child| child.is_element())
            .collect();

        if children.is_empty() {
            return Value::Text(node.text().unwrap_or_default().trim().to_string());
        }

        let mut map: BTreeMap<String, Vec<Value>> = BTreeMap::new();
        for attribute in node.attributes() {
            map.entry(attribute.name().to_string())
                .or_default()
                .push(Value::Text(attribute.value().to_string()));
        }
        for child in children {
            map.entry(child.tag_name().name().to_string())
                .or_default()
                .push(Value::from_node(child));
        }

        Value::Map(
            map.into_iter()
                .map(|(name, mut values)| {
                    if values.len() == 1 {
                        (name, values.remove(0))
                    } else {
                        (name, Value::List(values))
                    }
                })
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// The child tag names present under this element, for the TransXChange
    /// idiom of encoding a choice as which empty element is present
    /// (`DaysOfWeek`, `BankHolidayOperation`) rather than as an attribute.
    pub fn keys(&self) -> Vec<&str> {
        match self {
            Value::Map(map) => map.keys().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

/// Coerces a polyvariant field - absent, a single element, or a repeated
/// element - into a uniform slice of owned values. This is the "universal
/// into-list coercion at the parser boundary" that keeps the rest of the
/// crate from caring whether TransXChange chose to repeat an element or not.
pub trait IntoList {
    fn into_list(self) -> Vec<Value>;
}

impl IntoList for Option<&Value> {
    fn into_list(self) -> Vec<Value> {
        match self {
            None => Vec::new(),
            Some(Value::List(values)) => values.clone(),
            Some(other) => vec![other.clone()],
        }
    }
}

impl IntoList for &Value {
    fn into_list(self) -> Vec<Value> {
        Some(self).into_list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_child_stays_scalar_but_coerces_to_a_one_element_list() {
        let doc = roxmltree::Document::parse("<a><b>1</b></a>").unwrap();
        let value = Value::from_node(doc.root_element());
        assert!(matches!(value.get("b"), Some(Value::Text(_))));
        assert_eq!(value.get("b").into_list().len(), 1);
    }

    #[test]
    fn repeated_children_become_a_list() {
        let doc = roxmltree::Document::parse("<a><b>1</b><b>2</b></a>").unwrap();
        let value = Value::from_node(doc.root_element());
        let list = value.get("b").into_list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].as_text(), Some("1"));
        assert_eq!(list[1].as_text(), Some("2"));
    }

    #[test]
    fn absent_child_coerces_to_an_empty_list() {
        let doc = roxmltree::Document::parse("<a><b>1</b></a>").unwrap();
        let value = Value::from_node(doc.root_element());
        assert!(value.get("missing").into_list().is_empty());
    }

    #[test]
    fn keys_lists_the_present_child_tags() {
        let doc = roxmltree::Document::parse("<a><MondayToFriday/><Saturday/></a>").unwrap();
        let value = Value::from_node(doc.root_element());
        let mut keys = value.keys();
        keys.sort();
        assert_eq!(keys, vec!["MondayToFriday", "Saturday"]);
    }
}
