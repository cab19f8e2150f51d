//! The standard highlighting vocabulary.
//!
//! This module defines the closed set of tags that themes and language
//! definitions share, plus the standard modifiers. The set is created once,
//! lazily, and lives for the process; [`tags()`] hands out the singleton.
//!
//! The vocabulary is a shallow DAG: specific tags (say `lineComment`) sit
//! below general ones (`comment`), so a theme that only styles the general
//! tag still covers every specific one through the specificity chain.

use crate::tag::{Modifier, Tag};
use once_cell::sync::Lazy;

static TAGS: Lazy<Tags> = Lazy::new(Tags::new);

/// The standard tag set.
pub fn tags() -> &'static Tags {
    &TAGS
}

/// All standard tags and modifiers.
///
/// Fields are grouped by family; the family root is listed first.
pub struct Tags {
    // Comments
    pub comment: Tag,
    pub line_comment: Tag,
    pub block_comment: Tag,
    pub doc_comment: Tag,

    // Names
    pub name: Tag,
    pub variable_name: Tag,
    pub type_name: Tag,
    pub tag_name: Tag,
    pub property_name: Tag,
    pub attribute_name: Tag,
    pub class_name: Tag,
    pub label_name: Tag,
    pub namespace: Tag,
    pub macro_name: Tag,

    // Literals
    pub literal: Tag,
    pub string: Tag,
    pub doc_string: Tag,
    pub character: Tag,
    pub attribute_value: Tag,
    pub number: Tag,
    pub integer: Tag,
    pub float: Tag,
    pub boolean: Tag,
    pub regexp: Tag,
    pub escape: Tag,
    pub color: Tag,
    pub url: Tag,

    // Keywords
    pub keyword: Tag,
    pub self_keyword: Tag,
    pub null: Tag,
    pub atom: Tag,
    pub unit: Tag,
    pub modifier: Tag,
    pub operator_keyword: Tag,
    pub control_keyword: Tag,
    pub definition_keyword: Tag,
    pub module_keyword: Tag,

    // Operators
    pub operator: Tag,
    pub deref_operator: Tag,
    pub arithmetic_operator: Tag,
    pub logic_operator: Tag,
    pub bitwise_operator: Tag,
    pub compare_operator: Tag,
    pub update_operator: Tag,
    pub definition_operator: Tag,
    pub type_operator: Tag,
    pub control_operator: Tag,

    // Punctuation
    pub punctuation: Tag,
    pub separator: Tag,
    pub bracket: Tag,
    pub angle_bracket: Tag,
    pub square_bracket: Tag,
    pub paren: Tag,
    pub brace: Tag,

    // Prose content
    pub content: Tag,
    pub heading: Tag,
    pub heading1: Tag,
    pub heading2: Tag,
    pub heading3: Tag,
    pub heading4: Tag,
    pub heading5: Tag,
    pub heading6: Tag,
    pub content_separator: Tag,
    pub list: Tag,
    pub quote: Tag,
    pub emphasis: Tag,
    pub strong: Tag,
    pub link: Tag,
    pub monospace: Tag,
    pub strikethrough: Tag,

    // Changes
    pub inserted: Tag,
    pub deleted: Tag,
    pub changed: Tag,

    // Miscellaneous
    pub invalid: Tag,
    pub meta: Tag,
    pub document_meta: Tag,
    pub annotation: Tag,
    pub processing_instruction: Tag,

    // Standard modifiers
    pub definition: Modifier,
    pub constant: Modifier,
    pub function: Modifier,
    pub standard: Modifier,
    pub local: Modifier,
    pub special: Modifier,
}

impl Tags {
    fn new() -> Self {
        // Every parent here is unmodified, so the checked constructor
        // cannot fail and the unchecked one keeps init infallible.
        fn root(name: &str) -> Tag {
            Tag::define_unchecked(Some(name), None)
        }
        fn t(name: &str, parent: &Tag) -> Tag {
            Tag::define_unchecked(Some(name), Some(parent))
        }

        let comment = root("comment");
        let name = root("name");
        let literal = root("literal");
        let string = t("string", &literal);
        let number = t("number", &literal);
        let keyword = root("keyword");
        let operator = root("operator");
        let punctuation = root("punctuation");
        let bracket = t("bracket", &punctuation);
        let content = root("content");
        let heading = t("heading", &content);
        let meta = root("meta");
        let type_name = t("typeName", &name);
        let property_name = t("propertyName", &name);

        Tags {
            line_comment: t("lineComment", &comment),
            block_comment: t("blockComment", &comment),
            doc_comment: t("docComment", &comment),

            variable_name: t("variableName", &name),
            tag_name: t("tagName", &type_name),
            attribute_name: t("attributeName", &property_name),
            class_name: t("className", &name),
            label_name: t("labelName", &name),
            namespace: t("namespace", &name),
            macro_name: t("macroName", &name),

            doc_string: t("docString", &string),
            character: t("character", &string),
            attribute_value: t("attributeValue", &string),
            integer: t("integer", &number),
            float: t("float", &number),
            boolean: t("bool", &literal),
            regexp: t("regexp", &literal),
            escape: t("escape", &literal),
            color: t("color", &literal),
            url: t("url", &literal),

            self_keyword: t("self", &keyword),
            null: t("null", &keyword),
            atom: t("atom", &keyword),
            unit: t("unit", &keyword),
            modifier: t("modifier", &keyword),
            operator_keyword: t("operatorKeyword", &keyword),
            control_keyword: t("controlKeyword", &keyword),
            definition_keyword: t("definitionKeyword", &keyword),
            module_keyword: t("moduleKeyword", &keyword),

            deref_operator: t("derefOperator", &operator),
            arithmetic_operator: t("arithmeticOperator", &operator),
            logic_operator: t("logicOperator", &operator),
            bitwise_operator: t("bitwiseOperator", &operator),
            compare_operator: t("compareOperator", &operator),
            update_operator: t("updateOperator", &operator),
            definition_operator: t("definitionOperator", &operator),
            type_operator: t("typeOperator", &operator),
            control_operator: t("controlOperator", &operator),

            separator: t("separator", &punctuation),
            angle_bracket: t("angleBracket", &bracket),
            square_bracket: t("squareBracket", &bracket),
            paren: t("paren", &bracket),
            brace: t("brace", &bracket),

            heading1: t("heading1", &heading),
            heading2: t("heading2", &heading),
            heading3: t("heading3", &heading),
            heading4: t("heading4", &heading),
            heading5: t("heading5", &heading),
            heading6: t("heading6", &heading),
            content_separator: t("contentSeparator", &content),
            list: t("list", &content),
            quote: t("quote", &content),
            emphasis: t("emphasis", &content),
            strong: t("strong", &content),
            link: t("link", &content),
            monospace: t("monospace", &content),
            strikethrough: t("strikethrough", &content),

            inserted: root("inserted"),
            deleted: root("deleted"),
            changed: root("changed"),

            invalid: root("invalid"),
            document_meta: t("documentMeta", &meta),
            annotation: t("annotation", &meta),
            processing_instruction: t("processingInstruction", &meta),

            definition: Tag::define_modifier(Some("definition")),
            constant: Tag::define_modifier(Some("constant")),
            function: Tag::define_modifier(Some("function")),
            standard: Tag::define_modifier(Some("standard")),
            local: Tag::define_modifier(Some("local")),
            special: Tag::define_modifier(Some("special")),

            comment,
            name,
            literal,
            string,
            number,
            keyword,
            operator,
            punctuation,
            bracket,
            content,
            heading,
            meta,
            type_name,
            property_name,
        }
    }
}
