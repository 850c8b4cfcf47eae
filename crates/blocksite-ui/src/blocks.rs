//! Rendered content blocks.

use blocksite_blocks::RenderedBlock;
use leptos::prelude::*;

/// Blocks from a render pass, in order, keyed by block id.
///
/// Blocks whose renderer could not be resolved have no output and are
/// skipped.
#[component]
pub fn BlockList(
    /// Output of `ContentRenderer::render_all`.
    #[prop(into)]
    blocks: Signal<Vec<RenderedBlock>>,
) -> impl IntoView {
    view! {
      <div class="blocksite-blocks">
        <For
          each=move || blocks.get().into_iter().filter(|block| !block.is_empty())
          key=|block| block.key.clone()
          children=move |block| {
            view! {
              <div class="blocksite-block" data-block=block.type_tag.clone() inner_html=block.html></div>
            }
          }
        />
      </div>
    }
}
