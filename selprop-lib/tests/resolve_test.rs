use selprop_lib::style::owned_css::Stylesheet;
use selprop_lib::{resolve_references, FallbackScope, ResolveError, ResolveOptions};

#[cfg(test)]
pub mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn sheet(rules: &[(&str, &[(&str, &str)])]) -> Stylesheet {
        rules
            .iter()
            .fold(Stylesheet::new(), |sheet, (selector, decls)| {
                sheet.with_rule(selector, decls)
            })
    }

    fn transform(rules: &[(&str, &[(&str, &str)])]) -> Result<String, ResolveError> {
        transform_with(rules, &ResolveOptions::default())
    }

    fn transform_with(
        rules: &[(&str, &[(&str, &str)])],
        options: &ResolveOptions,
    ) -> Result<String, ResolveError> {
        init_logger();
        let mut sheet = sheet(rules);
        resolve_references(&mut sheet, options)?;
        Ok(sheet.to_string())
    }

    #[test]
    fn test_empty_stylesheet() {
        assert_eq!(transform(&[]).unwrap(), "");
    }

    #[test]
    fn test_sheet_without_references_is_unchanged() {
        let rules: &[(&str, &[(&str, &str)])] = &[
            (".a", &[("color", "blue"), ("margin", "0 auto")]),
            (".b, .c", &[("background", "var(--x, red)")]),
        ];
        assert_eq!(transform(rules).unwrap(), sheet(rules).to_string());
    }

    #[test]
    fn test_simple_selectors() {
        let out = transform(&[
            (".a", &[("color", "blue")]),
            (".z", &[("color", "ref(.a, color)")]),
        ])
        .unwrap();
        assert_eq!(out, ".a { color: blue }\n.z { color: blue }\n");
    }

    #[test]
    fn test_multiple_selectors() {
        let out = transform(&[
            (".a,\n.b", &[("color", "blue")]),
            (".x,\n.z", &[("color", "ref(.a, color)")]),
        ])
        .unwrap();
        assert_eq!(out, ".a,\n.b { color: blue }\n.x,\n.z { color: blue }\n");
    }

    #[test]
    fn test_pseudo_selectors() {
        let out = transform(&[
            (".a", &[("color", "blue")]),
            (".a:hover:not(:first-child)", &[("background", "darkblue")]),
            (".z", &[("background", "ref(.a:hover:not(:first-child), background)")]),
        ])
        .unwrap();
        assert_eq!(
            out,
            ".a { color: blue }\n.a:hover:not(:first-child) { background: darkblue }\n.z { background: darkblue }\n"
        );
    }

    #[test]
    fn test_local_selectors() {
        let out = transform(&[
            (
                ".a",
                &[
                    ("color", "blue"),
                    ("background", "ref(&, color)"),
                    ("border-color", "ref(&-b, color)"),
                ],
            ),
            (".a-b", &[("color", "red")]),
        ])
        .unwrap();
        assert_eq!(
            out,
            ".a { color: blue; background: blue; border-color: red }\n.a-b { color: red }\n"
        );
    }

    #[test]
    fn test_chain_in_document_order() {
        let out = transform(&[
            (".a", &[("color", "blue")]),
            (".b", &[("color", "ref(.a, color)")]),
            (".c", &[("color", "ref(.b, color)")]),
        ])
        .unwrap();
        assert_eq!(
            out,
            ".a { color: blue }\n.b { color: blue }\n.c { color: blue }\n"
        );
    }

    #[test]
    fn test_chain_with_forward_reference() {
        let out = transform(&[
            (".a", &[("color", "blue")]),
            (".b", &[("color", "ref(.a, color)")]),
            (".c", &[("color", "ref(.d, color)")]),
            (".d", &[("color", "ref(.b, color)")]),
        ])
        .unwrap();
        assert_eq!(
            out,
            ".a { color: blue }\n.b { color: blue }\n.c { color: blue }\n.d { color: blue }\n"
        );
    }

    #[test]
    fn test_chain_in_reverse_document_order() {
        let out = transform(&[
            (".c", &[("color", "ref(.b, color)")]),
            (".b", &[("color", "ref(.a, color)")]),
            (".a", &[("color", "blue")]),
        ])
        .unwrap();
        assert_eq!(
            out,
            ".c { color: blue }\n.b { color: blue }\n.a { color: blue }\n"
        );
    }

    #[test]
    fn test_fallback_when_property_is_missing() {
        let out = transform(&[
            (".a", &[("color", "blue")]),
            (".z", &[("color", "ref(.a, non-existent, white)")]),
        ])
        .unwrap();
        assert_eq!(out, ".a { color: blue }\n.z { color: white }\n");
    }

    #[test]
    fn test_fallback_when_selector_is_missing() {
        let out = transform(&[
            (".a", &[("color", "blue")]),
            (".m", &[("color", "ref(.n, color, #f00)")]),
        ])
        .unwrap();
        assert_eq!(out, ".a { color: blue }\n.m { color: #f00 }\n");
    }

    #[test]
    fn test_found_value_beats_fallback() {
        let out = transform(&[
            (".z", &[("color", "ref(.a, color, white)")]),
            (".a", &[("color", "blue")]),
            (".y", &[("margin", "0")]),
        ])
        .unwrap();
        assert_eq!(
            out,
            ".z { color: blue }\n.a { color: blue }\n.y { margin: 0 }\n"
        );
    }

    #[test]
    fn test_later_rule_for_same_selector_wins() {
        let out = transform(&[
            (".a", &[("color", "blue")]),
            (".a", &[("color", "green")]),
            (".z", &[("color", "ref(.a, color)")]),
        ])
        .unwrap();
        assert!(out.ends_with(".z { color: green }\n"), "{}", out);
    }

    #[test]
    fn test_within_declaration_functions() {
        let out = transform(&[
            (".a", &[("color", "blue")]),
            (".b", &[("color", "var(--bbb, ref(.a, color))")]),
            (".c", &[("color", "var(--ccc, ref(.b, color, orange))")]),
            (".d", &[("color", "var(--ddd, ref(.z, color, purple))")]),
        ])
        .unwrap();
        assert_eq!(
            out,
            ".a { color: blue }\n.b { color: var(--bbb, blue) }\n.c { color: var(--ccc, var(--bbb, blue)) }\n.d { color: var(--ddd, purple) }\n"
        );
    }

    #[test]
    fn test_selector_wide_fallback_reaches_other_properties() {
        let out = transform(&[
            (".m", &[("color", "ref(.n, color, red)"), ("margin", "ref(.n, margin)")]),
        ])
        .unwrap();
        assert_eq!(out, ".m { color: red; margin: red }\n");
    }

    #[test]
    fn test_property_scoped_fallbacks() {
        let options = ResolveOptions::new().with_fallback_scope(FallbackScope::Property);
        let out = transform_with(
            &[
                (".a", &[("color", "blue")]),
                (
                    ".m",
                    &[("margin", "ref(.a, margin, 1px)"), ("padding", "ref(.a, padding, 2px)")],
                ),
            ],
            &options,
        )
        .unwrap();
        assert_eq!(
            out,
            ".a { color: blue }\n.m { margin: 1px; padding: 2px }\n"
        );
    }

    #[test]
    fn test_property_scope_reports_selector_missing_a_fallback() {
        let options = ResolveOptions::new().with_fallback_scope(FallbackScope::Property);
        let err = transform_with(
            &[(".m", &[("color", "ref(.n, color, red)"), ("margin", "ref(.n, margin)")])],
            &options,
        )
        .unwrap_err();
        match err {
            ResolveError::UnresolvedSelector { selectors } => assert_eq!(selectors, vec![".n"]),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_missing_selector_without_fallback_fails() {
        let err = transform(&[
            (".a", &[("color", "ref(.x, color)")]),
            (".b", &[("color", "ref(.y, color)"), ("margin", "ref(.x, margin)")]),
        ])
        .unwrap_err();
        assert_eq!(err.to_string(), r#"Unresolved selectors: ".x", ".y""#);
    }

    #[test]
    fn test_failed_run_leaves_sheet_untouched() {
        let mut input = sheet(&[
            (".a", &[("color", "blue")]),
            (".b", &[("color", "ref(.a, color)")]),
            (".c", &[("color", "ref(.missing, color)")]),
        ]);
        let before = input.clone();
        assert!(resolve_references(&mut input, &ResolveOptions::default()).is_err());
        assert_eq!(input, before);
    }

    #[test]
    fn test_cycle_fails() {
        let err = transform(&[
            (".a", &[("color", "ref(.b, color)")]),
            (".b", &[("color", "ref(.c, color)")]),
            (".c", &[("color", "ref(.a, color)")]),
        ])
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cyclic reference: ref(.a, color) -> ref(.b, color) -> ref(.c, color) -> ref(.a, color)"
        );
    }

    #[test]
    fn test_missing_property_without_fallback_is_left_alone() {
        let out = transform(&[
            (".a", &[("color", "blue")]),
            (".z", &[("margin", "ref(.a, margin)")]),
        ])
        .unwrap();
        assert_eq!(out, ".a { color: blue }\n.z { margin: ref(.a, margin) }\n");
    }

    #[test]
    fn test_only_first_reference_is_resolved() {
        let out = transform(&[
            (".a", &[("color", "blue")]),
            (".b", &[("color", "red")]),
            (".z", &[("border-color", "ref(.a, color) ref(.b, color)")]),
        ])
        .unwrap();
        assert!(
            out.ends_with(".z { border-color: blue ref(.b, color) }\n"),
            "{}",
            out
        );
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        init_logger();
        let mut input = sheet(&[
            (".a", &[("color", "blue")]),
            (".z", &[("color", "ref(.a, color)")]),
        ]);
        resolve_references(&mut input, &ResolveOptions::default()).unwrap();
        let once = input.clone();
        let report = resolve_references(&mut input, &ResolveOptions::default()).unwrap();
        assert_eq!(input, once);
        assert_eq!(report.resolved + report.fallbacks + report.untouched, 0);
    }
}
