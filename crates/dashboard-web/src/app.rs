use leptos::prelude::*;

use crate::pages::TransactionAnalysisPage;

#[component]
pub fn App() -> impl IntoView {
    view! { <TransactionAnalysisPage /> }
}
