use crate::document::ElementNode;

/// Embeds from this host get a responsive 16:9 wrapper.
pub const VIDEO_HOST_PREFIX: &str = "https://www.youtube.com/";

const WRAPPER_STYLE: &str = "padding-bottom: 56.25%; position: relative; height: 0; overflow: hidden";
const FILL_STYLE: &str = "position: absolute; top: 0; left: 0; width: 100%; height: 100%";

/// Wraps video embeds in an aspect-ratio box; anything else is returned
/// untouched. `src` is not validated.
pub fn normalize(mut embed: ElementNode) -> ElementNode {
    let is_video = embed
        .attr("src")
        .is_some_and(|src| src.starts_with(VIDEO_HOST_PREFIX));
    if !is_video {
        return embed;
    }

    // The wrapper decides the size
    embed.attrs.remove("width");
    embed.attrs.remove("height");
    embed.attrs.insert("style".to_string(), FILL_STYLE.to_string());

    ElementNode::new("div")
        .with_attr("style", WRAPPER_STYLE)
        .with_child(embed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Node;
    use pretty_assertions::assert_eq;

    #[test]
    fn youtube_embed_is_wrapped() {
        let iframe = ElementNode::new("iframe")
            .with_attr("src", "https://www.youtube.com/embed/x")
            .with_attr("width", "560")
            .with_attr("height", "315")
            .with_attr("allowfullscreen", "");

        let wrapped = normalize(iframe);

        assert_eq!(wrapped.tag, "div");
        assert_eq!(wrapped.attr("style"), Some(WRAPPER_STYLE));
        let Node::Element(inner) = &wrapped.children[0] else {
            panic!("expected iframe child");
        };
        assert_eq!(
            inner,
            &ElementNode::new("iframe")
                .with_attr("src", "https://www.youtube.com/embed/x")
                .with_attr("allowfullscreen", "")
                .with_attr("style", FILL_STYLE)
        );
    }

    #[test]
    fn other_hosts_pass_through() {
        let iframe = ElementNode::new("iframe")
            .with_attr("src", "https://vimeo.com/x")
            .with_attr("width", "640");
        assert_eq!(normalize(iframe.clone()), iframe);
    }

    #[test]
    fn missing_src_passes_through() {
        let iframe = ElementNode::new("iframe");
        assert_eq!(normalize(iframe.clone()), iframe);
    }
}
