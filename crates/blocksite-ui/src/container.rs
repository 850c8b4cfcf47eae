//! Page container.

use leptos::prelude::*;

use crate::class::cn;

/// Classes for a [`Container`].
pub fn container_class(fluid: bool, disable_gutters: bool, class: &str) -> String {
    cn([
        "mx-auto px-4",
        if disable_gutters { "px-0" } else { "" },
        if fluid { "max-w-full" } else { "max-w-screen-lg" },
        class,
    ])
}

/// Horizontally centered wrapper limited to the large screen width.
#[component]
pub fn Container(
    /// Span the full viewport width instead of `max-w-screen-lg`.
    #[prop(optional)]
    fluid: bool,
    /// Remove the horizontal padding.
    #[prop(optional)]
    disable_gutters: bool,
    /// Extra classes merged after the defaults; conflicting utilities win.
    #[prop(optional, into)]
    class: String,
    /// Children content.
    children: Children,
) -> impl IntoView {
    view! { <div class=container_class(fluid, disable_gutters, &class)>{children()}</div> }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_classes() {
        assert_eq!(container_class(false, false, ""), "mx-auto px-4 max-w-screen-lg");
    }

    #[test]
    fn test_fluid() {
        assert_eq!(container_class(true, false, ""), "mx-auto px-4 max-w-full");
    }

    #[test]
    fn test_disable_gutters() {
        let class = container_class(false, true, "");
        assert_eq!(class, "mx-auto px-0 max-w-screen-lg");
        assert!(!class.split(' ').any(|c| c == "px-4"));
    }

    #[test]
    fn test_extra_class_overrides_width() {
        assert_eq!(
            container_class(false, false, "max-w-prose"),
            "mx-auto px-4 max-w-prose"
        );
    }

    #[test]
    fn test_extra_class_appended() {
        assert_eq!(
            container_class(false, false, "py-8"),
            "mx-auto px-4 max-w-screen-lg py-8"
        );
    }
}
