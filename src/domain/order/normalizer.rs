use super::value_objects::{Document, OrderItem, RawItem, DEFAULT_PAGE_COUNT};

// ============================================================================
// Item Normalization
// ============================================================================
//
// Maps storefront item descriptors onto the stored item shape. Total and
// pure: output index i always corresponds to input index i, since vendors
// fulfil items in submission order.
//
// ============================================================================

pub fn normalize_items(raw_items: &[RawItem]) -> Vec<OrderItem> {
    raw_items.iter().map(normalize_item).collect()
}

fn normalize_item(raw: &RawItem) -> OrderItem {
    let document = raw
        .s3_url
        .as_deref()
        .filter(|locator| !locator.is_empty())
        .map(|locator| Document {
            file_name: raw.file_name.clone(),
            file_path: locator.to_string(),
            page_count: raw.pages.filter(|&p| p > 0).unwrap_or(DEFAULT_PAGE_COUNT),
        });

    OrderItem {
        document,
        print_options: raw.print_options.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::value_objects::PrintOptions;
    use serde_json::json;

    fn uploaded(name: &str, pages: Option<u32>) -> RawItem {
        RawItem {
            file_name: Some(name.to_string()),
            s3_url: Some(format!("/blob/{}", name)),
            pages,
            print_options: PrintOptions(json!({"color": true})),
        }
    }

    #[test]
    fn test_document_built_from_locator() {
        let items = normalize_items(&[uploaded("a.pdf", Some(7))]);
        let document = items[0].document.as_ref().unwrap();

        assert_eq!(document.file_name.as_deref(), Some("a.pdf"));
        assert_eq!(document.file_path, "/blob/a.pdf");
        assert_eq!(document.page_count, 7);
    }

    #[test]
    fn test_page_count_defaults_to_one() {
        let items = normalize_items(&[uploaded("a.pdf", None), uploaded("b.pdf", Some(0))]);

        assert_eq!(items[0].document.as_ref().unwrap().page_count, 1);
        assert_eq!(items[1].document.as_ref().unwrap().page_count, 1);
    }

    #[test]
    fn test_missing_or_empty_locator_has_no_document() {
        let no_locator = RawItem {
            file_name: Some("ignored.pdf".to_string()),
            print_options: PrintOptions(json!({"color": false})),
            ..RawItem::default()
        };
        let empty_locator = RawItem {
            s3_url: Some(String::new()),
            ..RawItem::default()
        };

        let items = normalize_items(&[no_locator, empty_locator]);

        assert!(items[0].document.is_none());
        assert_eq!(items[0].print_options.0.get("color"), Some(&json!(false)));
        assert!(items[1].document.is_none());
    }

    #[test]
    fn test_preserves_order_and_options() {
        let raw = vec![
            uploaded("first.pdf", Some(2)),
            RawItem::default(),
            uploaded("third.pdf", None),
        ];

        let items = normalize_items(&raw);

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].document.as_ref().unwrap().file_path, "/blob/first.pdf");
        assert!(items[1].document.is_none());
        assert_eq!(items[2].document.as_ref().unwrap().file_path, "/blob/third.pdf");
        for (item, raw) in items.iter().zip(&raw) {
            assert_eq!(item.print_options, raw.print_options);
        }
    }

    #[test]
    fn test_normalization_is_repeatable() {
        let raw = vec![uploaded("a.pdf", None), RawItem::default()];
        assert_eq!(normalize_items(&raw), normalize_items(&raw));
    }
}
