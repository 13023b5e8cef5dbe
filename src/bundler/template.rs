//! Embedded metadata templates and the strict renderer that fills them.
//!
//! Templates are compiled into the binary. Rendering is strict: a placeholder
//! without a matching field is an error instead of an empty string, so a
//! missing field can never produce a structurally broken control file or plist.

use crate::bundler::error::{Context, ErrorExt, Result};
use handlebars::Handlebars;
use std::{collections::BTreeMap, path::Path, sync::LazyLock};

/// A named, embedded template.
#[derive(Debug, Clone, Copy)]
pub struct Template {
    /// Short name used in logs and error messages.
    pub name: &'static str,
    /// Handlebars source text.
    pub text: &'static str,
}

/// Debian `DEBIAN/control` file.
///
/// Fields: `Package`, `Version`, `Architecture`, `Maintainer`, `Description`.
pub const CONTROL: Template = Template {
    name: "control",
    text: include_str!("templates/control.hbs"),
};

/// freedesktop.org desktop entry.
///
/// Fields: `Name`, `Comment`, `Icon`, `Exec`.
pub const DESKTOP_ENTRY: Template = Template {
    name: "desktop",
    text: include_str!("templates/desktop.hbs"),
};

/// macOS bundle `Info.plist`.
///
/// Fields: `ID`, `LongID`, `Name`, `Copyright`, `Executable`, `Version`.
pub const INFO_PLIST: Template = Template {
    name: "info.plist",
    text: include_str!("templates/info.plist.hbs"),
};

/// Windows side-by-side application manifest.
///
/// Fields: `LongID`, `Version`, `Architecture`, `Name`, `Description`.
pub const APP_MANIFEST: Template = Template {
    name: "app.manifest",
    text: include_str!("templates/app.manifest.hbs"),
};

/// Placeholder values keyed by placeholder name.
pub type Fields<'a> = BTreeMap<&'static str, &'a str>;

static RENDERER: LazyLock<Handlebars<'static>> = LazyLock::new(|| {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(true);
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars
});

/// Fills `template_text` with `fields`.
///
/// Fails if the template is malformed or references a field not in `fields`.
pub fn render(template_text: &str, fields: &Fields<'_>) -> Result<String> {
    Ok(RENDERER.render_template(template_text, fields)?)
}

/// Renders `template` and writes the result to `dest`.
pub async fn write_rendered(template: Template, fields: &Fields<'_>, dest: &Path) -> Result<()> {
    let content = render(template.text, fields)
        .with_context(|| format!("error executing {} template", template.name))?;
    tokio::fs::write(dest, content)
        .await
        .fs_context("error writing rendered file", dest)?;
    log::debug!("Rendered {} template to {}", template.name, dest.display());
    Ok(())
}

/// Escapes text for inclusion in XML character data or attribute values.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::error::ErrorKind;

    fn control_fields() -> Fields<'static> {
        BTreeMap::from([
            ("Package", "foo"),
            ("Version", "1.0"),
            ("Architecture", "amd64"),
            ("Maintainer", "a@b.com"),
            ("Description", "Foo app"),
        ])
    }

    #[test]
    fn test_control_matches_golden() {
        let rendered = render(CONTROL.text, &control_fields()).unwrap();
        assert_eq!(
            rendered,
            "Package: foo\nVersion: 1.0\nArchitecture: amd64\nMaintainer: a@b.com\nDescription: Foo app\n"
        );
    }

    #[test]
    fn test_missing_field_fails_fast() {
        let mut fields = control_fields();
        fields.remove("Maintainer");
        let err = render(CONTROL.text, &fields).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Template);
    }

    #[test]
    fn test_values_are_not_html_escaped() {
        let fields = BTreeMap::from([
            ("Name", "Foo & Bar"),
            ("Comment", "<fast>"),
            ("Icon", "foo"),
            ("Exec", "foo"),
        ]);
        let rendered = render(DESKTOP_ENTRY.text, &fields).unwrap();
        assert!(rendered.contains("Name=Foo & Bar\n"));
        assert!(rendered.contains("Comment=<fast>\n"));
    }

    #[test]
    fn test_malformed_template() {
        let err = render("Package: {{Package", &control_fields()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Template);
    }

    #[test]
    fn test_embedded_templates_render_with_their_fields() {
        let plist = BTreeMap::from([
            ("ID", "foo"),
            ("LongID", "com.example.foo"),
            ("Name", "Foo"),
            ("Copyright", "(c) Example"),
            ("Executable", "foo"),
            ("Version", "1.0"),
        ]);
        let rendered = render(INFO_PLIST.text, &plist).unwrap();
        assert!(rendered.contains("<string>com.example.foo</string>"));
        assert!(rendered.contains("<string>foo.icns</string>"));

        let manifest = BTreeMap::from([
            ("LongID", "com.example.foo"),
            ("Version", "1.0.0.0"),
            ("Architecture", "amd64"),
            ("Name", "Foo"),
            ("Description", "Foo app"),
        ]);
        let rendered = render(APP_MANIFEST.text, &manifest).unwrap();
        assert!(rendered.contains("version=\"1.0.0.0\""));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("A & <B>"), "A &amp; &lt;B&gt;");
        assert_eq!(escape_xml("plain"), "plain");
    }
}
