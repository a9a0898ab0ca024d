//! Renders the shared page fragments (head, header, footer, post footer).

use crate::template::{self, Partial, Templates};
use crate::value::object;
use gtmpl::Value;
use std::collections::HashMap;

/// The rendered output of every [`Partial`] for one page. A new set is built
/// for every page, so nothing carries over from one page to the next.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fragments(HashMap<Partial, String>);

impl Fragments {
    /// Executes every partial against `{site, post}` and collects the
    /// results. `site` and `post` are the template values for the site
    /// configuration and the page being rendered.
    pub fn compose(templates: &Templates, site: &Value, post: &Value) -> template::Result<Fragments> {
        let data = object(vec![("site", site.clone()), ("post", post.clone())]);
        let mut rendered = HashMap::with_capacity(Partial::ALL.len());
        for partial in Partial::ALL.iter().copied() {
            rendered.insert(partial, templates.render_partial(partial, data.clone())?);
        }
        Ok(Fragments(rendered))
    }

    /// The output of `partial`.
    pub fn get(&self, partial: Partial) -> &str {
        self.0.get(&partial).map(String::as_str).unwrap_or_default()
    }

    /// Converts the fragments into a template value keyed by
    /// [`Partial::key`], e.g. `{{ .includes.Header }}`.
    pub fn to_value(&self) -> Value {
        object(
            Partial::ALL
                .iter()
                .map(|p| (p.key(), Value::String(self.get(*p).to_owned())))
                .collect::<Vec<_>>(),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::assets::DirectoryAssets;
    use std::fs;

    #[test]
    fn test_compose() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        fs::create_dir_all(dir.path().join("includes"))?;
        fs::write(dir.path().join("includes/head.html"), "<title>{{ .post.title }}</title>")?;
        fs::write(dir.path().join("includes/header.html"), "<h1>{{ .site.title }}</h1>")?;
        fs::write(dir.path().join("includes/footer.html"), "footer")?;
        fs::write(dir.path().join("includes/footer-post.html"), "{{ .post.root_name }}")?;
        let templates = Templates::load(&DirectoryAssets::new(dir.path()), vec![])?;

        let site = object(vec![("title", Value::String("Site".to_owned()))]);
        let post = object(vec![
            ("title", Value::String("Post".to_owned())),
            ("root_name", Value::String("hello".to_owned())),
        ]);
        let fragments = Fragments::compose(&templates, &site, &post)?;

        assert_eq!("<title>Post</title>", fragments.get(Partial::Head));
        assert_eq!("<h1>Site</h1>", fragments.get(Partial::Header));
        assert_eq!("footer", fragments.get(Partial::Footer));
        assert_eq!("hello", fragments.get(Partial::FooterPost));

        // A second page gets its own fragments.
        let other = object(vec![
            ("title", Value::String("Other".to_owned())),
            ("root_name", Value::String("other".to_owned())),
        ]);
        let second = Fragments::compose(&templates, &site, &other)?;
        assert_eq!("<title>Other</title>", second.get(Partial::Head));
        assert_eq!("<title>Post</title>", fragments.get(Partial::Head));
        Ok(())
    }

    #[test]
    fn test_failing_partial_aborts() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        fs::create_dir_all(dir.path().join("includes"))?;
        fs::write(dir.path().join("includes/head.html"), "{{ contains_tag .post }}")?;
        fs::write(dir.path().join("includes/header.html"), "-")?;
        fs::write(dir.path().join("includes/footer.html"), "-")?;
        fs::write(dir.path().join("includes/footer-post.html"), "-")?;
        let templates = Templates::load(&DirectoryAssets::new(dir.path()), vec![])?;

        let post = object(vec![("title", Value::String("Post".to_owned()))]);
        let result = Fragments::compose(&templates, &object(vec![]), &post);
        assert!(matches!(result, Err(template::Error::Execute { .. })));
        Ok(())
    }
}
