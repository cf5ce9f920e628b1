//! Snapchat AR lenses shown on the lenses page.
//!
//! The browser injects each snippet as raw HTML; Snapchat's `embed.js`
//! turns the blockquote into the interactive lens preview.

const SNAPCHAT_LENS_BASE: &str = "https://www.snapchat.com/lens";
const SNAPCHAT_EMBED_SCRIPT: &str = "https://www.snapchat.com/embed.js";

const EMBED_WIDTH: u32 = 416;
const EMBED_HEIGHT: u32 = 692;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Lens {
    pub(crate) id: &'static str,
    pub(crate) title: &'static str,
}

pub(crate) const LENSES: &[Lens] = &[
    Lens {
        id: "1d4141109bda4a8ea049b457074b4af9",
        title: "convocation Lens",
    },
    Lens {
        id: "41a9f0094b364eed9e85fe6799ebcf22",
        title: "Fantastic Hand Lens",
    },
];

impl Lens {
    pub(crate) fn url(&self) -> String {
        format!("{SNAPCHAT_LENS_BASE}/{}", self.id)
    }

    pub(crate) fn embed_url(&self) -> String {
        format!("{}/embed", self.url())
    }

    pub(crate) fn embed_html(&self) -> String {
        let url = self.url();
        let embed_url = self.embed_url();
        let title = self.title;

        format!(
            concat!(
                r#"<blockquote class="snapchat-embed" data-snapchat-embed-width="{width}" data-snapchat-embed-height="{height}" "#,
                r#"data-snapchat-embed-url="{embed_url}" data-snapchat-embed-style="border-radius: 40px;" data-snapchat-embed-title="{title}" "#,
                r#"style="background:#C4C4C4; border:0; border-radius:40px; box-shadow:0 0 1px 0 rgba(0,0,0,0.5),0 1px 10px 0 rgba(0,0,0,0.15); "#,
                r#"margin: 1px; max-width:416px; min-width:326px; padding:0; width:99.375%; width:-webkit-calc(100% - 2px); width:calc(100% - 2px); "#,
                r#"display: flex; flex-direction: column; position: relative; height:650px;">"#,
                r#" <div style="display: flex; flex-direction: row; align-items: center;">"#,
                r#"  <a title="{title}" href="{url}" style="background-color: #F4F4F4; border-radius: 50%; flex-grow: 0; height: 40px; width: 40px; margin:16px; cursor: pointer"></a>"#,
                r#"  <div style="display: flex; flex-direction: column; flex-grow: 1; justify-content: center;"></div> </div>"#,
                r#" <div style="flex: 1;"></div>"#,
                r#" <div style="display: flex; flex-direction: row; align-items: center; border-end-end-radius: 40px; border-end-start-radius: 40px;">"#,
                r#"  <a title="{title}" href="{url}" style="background-color: yellow; width:100%; padding: 10px 20px; border: none; border-radius: inherit; "#,
                r#"cursor: pointer; text-align: center; display: flex;flex-direction: row;justify-content: center; text-decoration: none; color: black;">"#,
                r#"  View more on Snapchat  </a> </div></blockquote>"#,
                r#"<script async src="{script}"></script>"#,
            ),
            width = EMBED_WIDTH,
            height = EMBED_HEIGHT,
            embed_url = embed_url,
            title = title,
            url = url,
            script = SNAPCHAT_EMBED_SCRIPT,
        )
    }
}

pub(crate) fn lens_embeds() -> Vec<String> {
    LENSES.iter().map(Lens::embed_html).collect()
}

#[cfg(test)]
mod tests {
    use super::{LENSES, lens_embeds};

    #[test]
    fn every_lens_renders_one_embed() {
        let embeds = lens_embeds();
        assert_eq!(embeds.len(), LENSES.len());
        assert_eq!(embeds.len(), 2);
    }

    #[test]
    fn embed_carries_lens_urls_and_title() {
        let lens = LENSES[1];
        let html = lens.embed_html();

        assert!(html.starts_with(r#"<blockquote class="snapchat-embed""#));
        assert!(html.contains(
            r#"data-snapchat-embed-url="https://www.snapchat.com/lens/41a9f0094b364eed9e85fe6799ebcf22/embed""#
        ));
        assert!(html.contains(r#"href="https://www.snapchat.com/lens/41a9f0094b364eed9e85fe6799ebcf22""#));
        assert!(html.contains(r#"data-snapchat-embed-title="Fantastic Hand Lens""#));
        assert!(html.ends_with(r#"<script async src="https://www.snapchat.com/embed.js"></script>"#));
    }
}
