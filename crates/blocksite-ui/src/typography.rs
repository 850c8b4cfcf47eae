//! Typography.

use leptos::prelude::*;

use crate::class::cn;

/// Text style of a [`Typography`] element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypographyVariant {
    H1,
    H2,
    H3,
    H4,
    #[default]
    P,
    Large,
}

impl TypographyVariant {
    /// Utility classes of the variant.
    pub fn classes(self) -> &'static str {
        match self {
            Self::H1 => {
                "scroll-m-20 text-4xl font-extrabold tracking-tight text-black dark:text-black lg:text-5xl"
            }
            Self::H2 => {
                "mt-10 scroll-m-20 pb-2 text-3xl font-bold tracking-tight text-black dark:text-black first:mt-0 lg:text-4xl"
            }
            Self::H3 => {
                "mt-8 scroll-m-20 text-2xl font-semibold tracking-tight text-black dark:text-black"
            }
            Self::H4 => {
                "mt-6 scroll-m-20 text-xl font-semibold tracking-tight text-black dark:text-black"
            }
            Self::P => {
                "text-base leading-relaxed text-black dark:text-black [&:not(:first-child)]:mt-4"
            }
            Self::Large => "text-lg font-medium text-black dark:text-black",
        }
    }

    /// HTML element rendered for the variant.
    pub fn element(self) -> &'static str {
        match self {
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::H4 => "h4",
            Self::P => "p",
            Self::Large => "div",
        }
    }
}

/// Classes for a [`Typography`] element.
pub fn typography_class(variant: TypographyVariant, class: &str) -> String {
    cn([variant.classes(), class])
}

/// Text in one of the site's type styles.
#[component]
pub fn Typography(
    /// Text style; defaults to body text.
    #[prop(optional)]
    variant: TypographyVariant,
    /// Extra classes appended after the variant's.
    #[prop(optional, into)]
    class: String,
    /// Children content.
    children: Children,
) -> impl IntoView {
    let class = typography_class(variant, &class);

    match variant {
        TypographyVariant::H1 => view! { <h1 class=class>{children()}</h1> }.into_any(),
        TypographyVariant::H2 => view! { <h2 class=class>{children()}</h2> }.into_any(),
        TypographyVariant::H3 => view! { <h3 class=class>{children()}</h3> }.into_any(),
        TypographyVariant::H4 => view! { <h4 class=class>{children()}</h4> }.into_any(),
        TypographyVariant::P => view! { <p class=class>{children()}</p> }.into_any(),
        TypographyVariant::Large => view! { <div class=class>{children()}</div> }.into_any(),
    }
}
