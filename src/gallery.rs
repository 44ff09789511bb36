//! Lightbox auto-linking of article images.
//!
//! A one-shot pass: every eligible `img` in the article root is wrapped in an
//! anchor the lightbox script picks up, then every gallery link in the
//! document gets the shared `rel`. The pass keeps no state and is safe to
//! re-run.

use tracing::{debug, info, warn};
use url::Url;

use crate::dom::{Dom, Selector};
use crate::enhancer::options::EnhancerOptions;
use crate::error::{Error, Result};
use crate::identifiers::NodeId;

/// Wraps eligible images. Returns how many were wrapped.
///
/// An image is skipped when its parent already is a gallery link, when it
/// carries the opt-out class, or when it lives inside a compare or carousel
/// container. A failure on one image is logged and the pass moves on.
pub fn wrap_gallery_images<D: Dom + ?Sized>(dom: &D, options: &EnhancerOptions) -> usize {
    let wrapped = match find_article(dom, &options.article_selector()) {
        Some(article) => wrap_article_images(dom, article, options),
        None => {
            debug!(root = %options.article_root, "No article root, nothing to wrap");
            0
        }
    };

    let link_class = Selector::class(&options.gallery.link_class);
    for link in dom.query_all(dom.root(), &link_class) {
        dom.set_attribute(link, "rel", &options.gallery.rel);
    }

    if wrapped > 0 {
        info!(count = wrapped, "Gallery images wrapped");
    }
    wrapped
}

fn wrap_article_images<D: Dom + ?Sized>(
    dom: &D,
    article: NodeId,
    options: &EnhancerOptions,
) -> usize {
    let mut wrapped = 0;
    for img in dom.query_all(article, &Selector::tag("img")) {
        if !is_eligible(dom, img, options) {
            continue;
        }
        match wrap_image(dom, img, options) {
            Ok(link) => {
                debug!(node = %img, link = %link, "Image linked to lightbox");
                wrapped += 1;
            }
            Err(err) => warn!(node = %img, error = %err, "Could not wrap image"),
        }
    }
    wrapped
}

fn find_article<D: Dom + ?Sized>(dom: &D, selector: &Selector) -> Option<NodeId> {
    let root = dom.root();
    if selector.matches(dom, root) {
        return Some(root);
    }
    dom.query(root, selector)
}

fn is_eligible<D: Dom + ?Sized>(dom: &D, img: NodeId, options: &EnhancerOptions) -> bool {
    let gallery = &options.gallery;

    if dom
        .parent(img)
        .is_some_and(|parent| dom.has_class(parent, &gallery.link_class))
    {
        return false;
    }
    if dom.has_class(img, &gallery.opt_out_class) {
        return false;
    }

    let widgets = [
        Selector::class(&options.compare.container),
        Selector::class(&options.carousel.container),
    ];
    !widgets
        .iter()
        .any(|selector| dom.closest(img, selector).is_some())
}

fn wrap_image<D: Dom + ?Sized>(dom: &D, img: NodeId, options: &EnhancerOptions) -> Result<NodeId> {
    let gallery = &options.gallery;
    let parent = dom.parent(img).ok_or_else(|| Error::node_not_found(img))?;

    let src = resolve_source(
        options.base_url.as_ref(),
        &dom.attribute(img, "src").unwrap_or_default(),
    );
    let href = dom
        .attribute(img, &gallery.full_source_attr)
        .unwrap_or_else(|| src.clone());

    let link = dom.create_element("a");
    dom.set_attribute(link, "href", &href);
    dom.set_attribute(link, "data-src", &src);
    dom.add_class(link, &gallery.link_class);
    dom.set_attribute(link, "data-fancybox", &gallery.group);

    dom.insert_before(parent, link, img)?;
    dom.append_child(link, img)?;
    Ok(link)
}

/// Resolves `src` the way the browser's `img.src` property does.
///
/// Without a base URL, or when `src` cannot be joined, `src` is returned as
/// written.
#[must_use]
pub fn resolve_source(base: Option<&Url>, src: &str) -> String {
    let Some(base) = base else {
        return src.to_string();
    };
    match base.join(src) {
        Ok(url) => url.into(),
        Err(err) => {
            warn!(src, error = %err, "Keeping unresolvable image source");
            src.to_string()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
