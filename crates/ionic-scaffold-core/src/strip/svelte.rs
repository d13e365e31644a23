//! Type erasure for Svelte components
//!
//! Script blocks go through the TypeScript stripper. The markup only ever
//! carries types in three places, each handled by its own pattern:
//! `{#snippet name(param: T)}`, `{@const name: T = value}` and inline event
//! handlers such as `onclick={(e: MouseEvent) => ...}`.

use super::typescript::strip_types;
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Script-tag attributes that only mean something to the TypeScript toolchain
const TYPED_SCRIPT_ATTRIBUTES: &[&str] = &["lang", "generics"];

fn script_block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)(<script[^>]*>)(.*?)(</script>)").expect("valid script block regex")
    })
}

fn raw_block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<script\b.*?</script>|<style\b.*?</style>").expect("valid raw block regex")
    })
}

fn snippet_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{#snippet\s+([^(}]+)\(([^)]+?)(?::\s*[^,)]+)?(?:,\s*([^):]+)(?::\s*[^,)]+)?)*\)\}")
            .expect("valid snippet regex")
    })
}

fn annotation_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r":\s*[^,)]+").expect("valid annotation regex"))
}

fn const_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{@const\s+([^:=]+)\s*:\s*[^=]+\s*=\s*([^}]+)\}").expect("valid const tag regex")
    })
}

fn event_handler_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"on(\w+)=\{\(([^)]*?):[^)]*\)(?::\s*[^=]*?)?\s*=>\s*([^}]*)\}")
            .expect("valid event handler regex")
    })
}

fn assertion_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+as\s+[A-Za-z0-9_<>|&\[\]]+").expect("valid assertion regex"))
}

/// Produce the plain JavaScript version of a Svelte component
pub fn strip_svelte(content: &str) -> String {
    let mut result = content.to_string();
    for attribute in TYPED_SCRIPT_ATTRIBUTES {
        result = remove_script_attribute(&result, attribute);
    }
    let result = strip_script_blocks(&result);
    strip_markup(&result)
}

/// Remove `name="..."`, `name='...'` or `name=...` from every `<script>` tag
pub fn remove_script_attribute(content: &str, name: &str) -> String {
    let name = regex::escape(name);
    let forms = [
        format!(r#"(<script[^>]*?)\s+{name}="[^"]*"([^>]*>)"#),
        format!(r#"(<script[^>]*?)\s+{name}='[^']*'([^>]*>)"#),
        format!(r#"(<script[^>]*?)\s+{name}=[^\s>"']+([^>]*>)"#),
    ];

    let mut result = content.to_string();
    for pattern in forms {
        // Built from escaped input, so always valid
        if let Ok(re) = Regex::new(&pattern) {
            result = re.replace_all(&result, "${1}${2}").into_owned();
        }
    }
    result
}

fn strip_script_blocks(content: &str) -> String {
    script_block_regex()
        .replace_all(content, |caps: &Captures| {
            format!("{}{}{}", &caps[1], strip_types(&caps[2]), &caps[3])
        })
        .into_owned()
}

/// Apply the markup rewrites to everything outside `<script>` and `<style>`
fn strip_markup(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut last = 0;
    for block in raw_block_regex().find_iter(content) {
        out.push_str(&rewrite_markup(&content[last..block.start()]));
        out.push_str(block.as_str());
        last = block.end();
    }
    out.push_str(&rewrite_markup(&content[last..]));
    out
}

fn rewrite_markup(markup: &str) -> String {
    let markup = snippet_regex().replace_all(markup, |caps: &Captures| {
        annotation_regex().replace_all(&caps[0], "").into_owned()
    });

    let markup = const_tag_regex().replace_all(&markup, |caps: &Captures| {
        let expression = assertion_regex().replace_all(&caps[2], "");
        format!("{{@const {} = {}}}", caps[1].trim(), expression)
    });

    event_handler_regex()
        .replace_all(&markup, |caps: &Captures| {
            let body = assertion_regex().replace_all(&caps[3], "");
            format!("on{}={{({}) => {}}}", &caps[1], caps[2].trim(), body)
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_attribute_forms_reduce_identically() {
        let double = strip_svelte("<script lang=\"ts\" module>\n</script>");
        let single = strip_svelte("<script lang='ts' module>\n</script>");
        let bare = strip_svelte("<script lang=ts module>\n</script>");
        assert_eq!(double, "<script module>\n</script>");
        assert_eq!(single, double);
        assert_eq!(bare, double);
    }

    #[test]
    fn test_other_attributes_are_kept() {
        assert_eq!(
            remove_script_attribute("<script context=\"module\" lang=\"ts\">", "lang"),
            "<script context=\"module\">"
        );
        assert_eq!(
            strip_svelte("<script lang=\"ts\" generics=\"T extends Item\">let x = 1;</script>"),
            "<script>let x = 1;</script>"
        );
    }

    #[test]
    fn test_script_contents_are_stripped() {
        let input = "<script lang=\"ts\">\n\tlet { tabs }: Props = $props();\n</script>\n\n<p>{tabs.length}</p>\n";
        assert_eq!(
            strip_svelte(input),
            "<script>\n\tlet { tabs } = $props();\n</script>\n\n<p>{tabs.length}</p>\n"
        );
    }

    #[test]
    fn test_snippet_parameters() {
        assert_eq!(
            strip_svelte("{#snippet planetLink(planet: Planet, index: number)}\n<a>{planet}</a>\n{/snippet}"),
            "{#snippet planetLink(planet, index)}\n<a>{planet}</a>\n{/snippet}"
        );
    }

    #[test]
    fn test_const_tag() {
        assert_eq!(
            strip_svelte("{@const planet: string = planets[index] as string}"),
            "{@const planet = planets[index]}"
        );
    }

    #[test]
    fn test_event_handler() {
        assert_eq!(
            strip_svelte("<button onclick={(e: MouseEvent) => select(e.target as HTMLElement)}>Go</button>"),
            "<button onclick={(e) => select(e.target)}>Go</button>"
        );
    }

    #[test]
    fn test_style_and_plain_markup_untouched() {
        let input = "<style>\n\ta { color: red; }\n</style>\n<p title=\"a: b\">{value}</p>\n";
        assert_eq!(strip_svelte(input), input);
    }

    #[test]
    fn test_component_stripping_is_idempotent() {
        let input = r#"<script lang="ts">
	import type { Snippet } from 'svelte';
	let { children }: { children: Snippet } = $props();
	let count = $state<number>(0);
</script>

{#snippet item(label: string)}
	<li>{label}</li>
{/snippet}
<button onclick={(e: Event) => count++}>{count}</button>
{@render children()}
"#;
        let once = strip_svelte(input);
        assert!(once.starts_with("<script>\n"));
        assert!(!once.contains("Snippet"));
        assert!(once.contains("let count = $state(0);"));
        assert!(once.contains("{#snippet item(label)}"));
        assert!(once.contains("onclick={(e) => count++}"));
        assert_eq!(strip_svelte(&once), once);
    }

    #[test]
    fn test_non_ascii_block_comment_in_script() {
        let input = "<script lang=\"ts\">\n\t/* Plan\u{e8}tes \u{2014} liste */\n\tlet count: number = 8;\n</script>\n\n<p>{count} plan\u{e8}tes</p>\n";
        assert_eq!(
            strip_svelte(input),
            "<script>\n\t/* Plan\u{e8}tes \u{2014} liste */\n\tlet count = 8;\n</script>\n\n<p>{count} plan\u{e8}tes</p>\n"
        );
    }
}
