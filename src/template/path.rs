// ABOUTME: Path expression parsing and evaluation against accessor graphs
// ABOUTME: Resolves dotted, optionally indexed accessor chains such as schritte[0].titel

use std::fmt;
use std::str::FromStr;

use super::error::{Result, TemplateError};
use super::value::{accessor_key, Accessible, Value};

/// One `.`-separated step of a path expression, e.g. `schritte[0]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    pub accessor: String,
    pub index: Option<usize>,
}

/// A parsed path expression such as `schritte[0].bearbeitungsbenutzer.standort`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpression {
    source: String,
    segments: Vec<PathSegment>,
}

impl PathSegment {
    /// Parse `name` or `name[N]`
    pub fn parse(raw: &str) -> Result<Self> {
        let Some(open) = raw.find('[') else {
            return Ok(Self {
                accessor: raw.to_string(),
                index: None,
            });
        };

        let malformed = || TemplateError::MalformedIndex {
            segment: raw.to_string(),
        };

        let digits = raw[open + 1..].strip_suffix(']').ok_or_else(malformed)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let index = digits.parse::<usize>().map_err(|_| malformed())?;

        Ok(Self {
            accessor: raw[..open].to_string(),
            index: Some(index),
        })
    }
}

impl PathExpression {
    /// Split an expression on `.` and parse every segment
    pub fn parse(expression: &str) -> Result<Self> {
        let segments = expression
            .split('.')
            .map(PathSegment::parse)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            source: expression.to_string(),
            segments,
        })
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Walk the path from `root`.
    ///
    /// Returns `Ok(None)` as soon as any accessor or list element yields null.
    /// A missing accessor is an error, not an absence.
    pub fn evaluate(&self, root: &dyn Accessible) -> Result<Option<String>> {
        let mut current = Value::Object(root);

        for segment in &self.segments {
            let object = match current {
                Value::Object(object) => object,
                other => {
                    return Err(TemplateError::NoAccessor {
                        accessor: segment.accessor.clone(),
                        type_name: other.kind(),
                    })
                }
            };

            let mut next = object
                .access(&accessor_key(&segment.accessor))
                .ok_or_else(|| TemplateError::NoAccessor {
                    accessor: segment.accessor.clone(),
                    type_name: object.type_name().to_string(),
                })?;

            if let Some(index) = segment.index {
                next = match next {
                    Value::Null => return Ok(None),
                    Value::List(items) => {
                        let len = items.len();
                        items.into_iter().nth(index).ok_or_else(|| {
                            TemplateError::IndexOutOfRange {
                                accessor: segment.accessor.clone(),
                                index,
                                len,
                            }
                        })?
                    }
                    other => {
                        return Err(TemplateError::IndexOnNonSequence {
                            accessor: segment.accessor.clone(),
                            found: other.kind(),
                        })
                    }
                };
            }

            if next.is_null() {
                return Ok(None);
            }
            current = next;
        }

        Ok(Some(current.to_string()))
    }
}

impl FromStr for PathExpression {
    type Err = TemplateError;

    fn from_str(expression: &str) -> Result<Self> {
        Self::parse(expression)
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// Parse and evaluate `expression` against `root` in one step
pub fn evaluate(root: &dyn Accessible, expression: &str) -> Result<Option<String>> {
    PathExpression::parse(expression)?.evaluate(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Shelf {
        label: Option<String>,
        books: Vec<Book>,
    }

    struct Book {
        title: String,
        pages: i64,
    }

    impl Accessible for Shelf {
        fn access(&self, name: &str) -> Option<Value<'_>> {
            match name {
                "label" => Some(Value::from(self.label.as_ref())),
                "books" => Some(Value::list(self.books.iter().map(Value::object))),
                "count" => Some(Value::from(self.books.len() as i64)),
                _ => None,
            }
        }

        fn type_name(&self) -> &'static str {
            "Shelf"
        }

        fn render(&self) -> String {
            "shelf".to_string()
        }
    }

    impl Accessible for Book {
        fn access(&self, name: &str) -> Option<Value<'_>> {
            match name {
                "title" => Some(Value::from(&self.title)),
                "pages" => Some(Value::from(self.pages)),
                _ => None,
            }
        }

        fn type_name(&self) -> &'static str {
            "Book"
        }

        fn render(&self) -> String {
            self.title.clone()
        }
    }

    fn shelf() -> Shelf {
        Shelf {
            label: None,
            books: vec![
                Book {
                    title: "Faust".to_string(),
                    pages: 320,
                },
                Book {
                    title: "Werther".to_string(),
                    pages: 180,
                },
            ],
        }
    }

    #[test]
    fn test_parse_segments() {
        let path = PathExpression::parse("books[1].title").unwrap();
        assert_eq!(
            path.segments(),
            &[
                PathSegment {
                    accessor: "books".to_string(),
                    index: Some(1)
                },
                PathSegment {
                    accessor: "title".to_string(),
                    index: None
                },
            ]
        );
        assert_eq!(path.to_string(), "books[1].title");
    }

    #[test]
    fn test_malformed_indices() {
        for expression in ["books[]", "books[-1]", "books[x]", "books[1", "books[1]x", "books[ 1]"] {
            let result = PathExpression::parse(expression);
            assert!(
                matches!(result, Err(TemplateError::MalformedIndex { .. })),
                "expected MalformedIndex for {expression}"
            );
        }
    }

    #[test]
    fn test_evaluate_indexed_path() {
        let shelf = shelf();
        assert_eq!(
            evaluate(&shelf, "books[1].title").unwrap(),
            Some("Werther".to_string())
        );
        assert_eq!(
            evaluate(&shelf, "books[0].pages").unwrap(),
            Some("320".to_string())
        );
    }

    #[test]
    fn test_capitalized_accessor_name() {
        let shelf = shelf();
        assert_eq!(
            evaluate(&shelf, "Books[0].Title").unwrap(),
            Some("Faust".to_string())
        );
    }

    #[test]
    fn test_leaf_object_and_list_rendering() {
        let shelf = shelf();
        assert_eq!(evaluate(&shelf, "books[0]").unwrap(), Some("Faust".to_string()));
        assert_eq!(
            evaluate(&shelf, "books").unwrap(),
            Some("[Faust, Werther]".to_string())
        );
    }

    #[test]
    fn test_null_intermediate_is_absent() {
        let shelf = shelf();
        assert_eq!(evaluate(&shelf, "label").unwrap(), None);
        assert_eq!(evaluate(&shelf, "label.length").unwrap(), None);
    }

    #[test]
    fn test_indexed_null_and_null_element_are_absent() {
        let shelf = shelf();
        assert_eq!(evaluate(&shelf, "label[0]").unwrap(), None);
        assert_eq!(evaluate(&shelf, "label[3].length").unwrap(), None);

        let root: serde_yaml::Mapping = serde_yaml::from_str("items: [~, b]").unwrap();
        assert_eq!(evaluate(&root, "items[0]").unwrap(), None);
        assert_eq!(evaluate(&root, "items[0].name").unwrap(), None);
        assert_eq!(evaluate(&root, "items[1]").unwrap(), Some("b".to_string()));
    }

    #[test]
    fn test_missing_accessor() {
        let shelf = shelf();
        let error = evaluate(&shelf, "owner.name").unwrap_err();
        assert!(matches!(
            error,
            TemplateError::NoAccessor { ref accessor, ref type_name } if accessor == "owner" && type_name == "Shelf"
        ));

        let error = evaluate(&shelf, "").unwrap_err();
        assert!(matches!(error, TemplateError::NoAccessor { .. }));
    }

    #[test]
    fn test_accessor_on_scalar() {
        let shelf = shelf();
        let error = evaluate(&shelf, "count.value").unwrap_err();
        assert!(matches!(
            error,
            TemplateError::NoAccessor { ref type_name, .. } if type_name == "integer"
        ));
    }

    #[test]
    fn test_index_errors() {
        let shelf = shelf();
        assert!(matches!(
            evaluate(&shelf, "count[0]").unwrap_err(),
            TemplateError::IndexOnNonSequence { .. }
        ));
        assert!(matches!(
            evaluate(&shelf, "books[2].title").unwrap_err(),
            TemplateError::IndexOutOfRange { index: 2, len: 2, .. }
        ));
    }
}
