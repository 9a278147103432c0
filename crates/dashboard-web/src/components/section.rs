use leptos::prelude::*;

/// Titled block of the page
#[component]
pub fn Section(#[prop(into)] id: String, #[prop(into)] title: String, children: Children) -> impl IntoView {
    view! {
        <section id=id class="mb-6">
            <h2 class="font-bold mb-2">{title}</h2>
            <div class="pl-4 border-l border-[var(--rule)]">
                {children()}
            </div>
        </section>
    }
}
