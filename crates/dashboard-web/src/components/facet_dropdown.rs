use dashboard_core::{DashboardState, FacetOption, SelectAllState};
use leptos::ev::Event;
use leptos::prelude::*;

/// Multi-select dropdown for one facet: summary button, search box,
/// tri-state select-all and the option checklist
#[component]
pub fn FacetDropdown(state: RwSignal<DashboardState>, #[prop(into)] key: String, on_change: Callback<()>) -> impl IntoView {
    let open = RwSignal::new(false);

    let label = state.with_untracked(|s| s.facet(&key).map(|f| f.label().to_string()).unwrap_or_default());

    let summary = {
        let key = key.clone();
        move || state.with(|s| s.facet(&key).map(|f| f.summary().to_string()).unwrap_or_default())
    };

    let select_all = {
        let key = key.clone();
        move || {
            state.with(|s| {
                s.facet(&key)
                    .map(|f| f.select_all_state())
                    .unwrap_or(SelectAllState::Unchecked)
            })
        }
    };
    let select_all_checked = {
        let select_all = select_all.clone();
        move || select_all().is_checked()
    };
    let select_all_indeterminate = move || select_all().is_indeterminate();

    let on_select_all = {
        let key = key.clone();
        move |ev: Event| {
            let checked = event_target_checked(&ev);
            if state.try_update(|s| s.set_facet_all(&key, checked)).unwrap_or(false) {
                on_change.run(());
            }
        }
    };

    let search = {
        let key = key.clone();
        move || state.with(|s| s.facet(&key).map(|f| f.search().to_string()).unwrap_or_default())
    };
    let on_search = {
        let key = key.clone();
        move |ev: Event| {
            let term = event_target_value(&ev);
            state.update(|s| s.set_facet_search(&key, &term));
        }
    };

    let visible = {
        let key = key.clone();
        move || {
            state.with(|s| {
                s.facet(&key)
                    .map(|f| f.visible_options().cloned().collect::<Vec<_>>())
                    .unwrap_or_default()
            })
        }
    };

    view! {
        <div class="facet">
            <label class="block text-sm">{label}</label>
            <button type="button" class="facet-toggle" on:click=move |_| open.update(|o| *o = !*o)>
                {summary}
            </button>
            <div class="facet-panel" class:hidden=move || !open.get()>
                <input type="search" placeholder="Search" prop:value=search on:input=on_search />
                <label class="block">
                    <input
                        type="checkbox"
                        prop:checked=select_all_checked
                        prop:indeterminate=select_all_indeterminate
                        on:change=on_select_all
                    />
                    " Select all"
                </label>
                <For
                    each=visible
                    key=|option: &FacetOption| option.value.clone()
                    children=move |option: FacetOption| {
                        view! { <FacetOptionRow state facet_key=key.clone() option on_change /> }
                    }
                />
            </div>
        </div>
    }
}

#[component]
fn FacetOptionRow(
    state: RwSignal<DashboardState>,
    facet_key: String,
    option: FacetOption,
    on_change: Callback<()>,
) -> impl IntoView {
    let FacetOption { label, value } = option;

    let checked = {
        let facet_key = facet_key.clone();
        let value = value.clone();
        move || state.with(|s| s.facet(&facet_key).is_some_and(|f| f.is_checked(&value)))
    };

    let on_toggle = move |ev: Event| {
        let checked = event_target_checked(&ev);
        if state
            .try_update(|s| s.set_option_checked(&facet_key, &value, checked))
            .unwrap_or(false)
        {
            on_change.run(());
        }
    };

    view! {
        <label class="block">
            <input type="checkbox" prop:checked=checked on:change=on_toggle />
            " " {label}
        </label>
    }
}
