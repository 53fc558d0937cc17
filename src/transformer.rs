//! Keyword substitution
//!
//! Every dialect keyword in a code piece is replaced in one regex pass over
//! the shielded text. A single pass means an inserted equivalent is never
//! rescanned, so `maybe` → `else if` cannot cascade into another rewrite.

use crate::helpers::stands_alone;
use crate::keywords::KeywordTable;
use crate::string_shield::shield;

pub struct Transformer<'t> {
    table: &'t KeywordTable,
}

impl<'t> Transformer<'t> {
    pub fn new(table: &'t KeywordTable) -> Self {
        Transformer { table }
    }

    /// Substitute keywords in text whose string literals are already shielded
    pub fn transform(&self, shielded: &str) -> String {
        self.table
            .word_pattern()
            .replace_all(shielded, |caps: &regex_lite::Captures<'_>| {
                let word = &caps[0];
                let Some(m) = caps.get(0) else {
                    return word.to_string();
                };
                if !stands_alone(shielded, m.start(), m.end()) {
                    return word.to_string();
                }
                self.table
                    .lookup(word)
                    .map_or_else(|| word.to_string(), |spec| spec.equivalent().to_string())
            })
            .into_owned()
    }

    /// Shield, substitute and restore one raw code piece
    pub fn transform_code(&self, code: &str) -> String {
        let shielded = shield(code);
        shielded.restore(&self.transform(shielded.text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_keywords() {
        let table = KeywordTable::jolly();
        let t = Transformer::new(&table);
        assert_eq!(t.transform_code("free pi = 3.14;"), "let pi = 3.14;");
        assert_eq!(t.transform_code("} maybe (x < 0) {"), "} else if (x < 0) {");
        assert_eq!(t.transform_code("lock obj = call MyClass();"), "const obj = new MyClass();");
    }

    #[test]
    fn test_word_boundaries() {
        let table = KeywordTable::jolly();
        let t = Transformer::new(&table);
        assert_eq!(t.transform_code("free funny = freedom + locker;"), "let funny = freedom + locker;");
        assert_eq!(t.transform_code("obj.fun_count"), "obj.fun_count");
    }

    #[test]
    fn test_dollar_identifiers() {
        let table = KeywordTable::jolly();
        let t = Transformer::new(&table);
        assert_eq!(t.transform_code("console.log($fun, free$);"), "console.log($fun, free$);");
        assert_eq!(t.transform_code("free $lock = $ + fun;"), "let $lock = $ + function;");
    }

    #[test]
    fn test_strings_untouched() {
        let table = KeywordTable::jolly();
        let t = Transformer::new(&table);
        assert_eq!(
            t.transform_code(r#"yay "yay, fun" + 'lock';"#),
            r#"return "yay, fun" + 'lock';"#
        );
    }

    #[test]
    fn test_keyword_next_to_literal() {
        let table = KeywordTable::jolly();
        let t = Transformer::new(&table);
        assert_eq!(t.transform_code(r#"option "apple":"#), r#"case "apple":"#);
    }
}
