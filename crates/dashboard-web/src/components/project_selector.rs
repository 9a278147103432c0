use dashboard_core::projects::NO_MATCHING_PROJECTS;
use dashboard_core::{DashboardState, ProjectEntry};
use leptos::ev::Event;
use leptos::prelude::*;

/// Project checklist with name search; select-all acts on the visible
/// projects only
#[component]
pub fn ProjectSelector(state: RwSignal<DashboardState>, on_change: Callback<()>) -> impl IntoView {
    let visible = move || state.with(|s| s.projects().visible().cloned().collect::<Vec<_>>());
    let all_checked = move || state.with(|s| s.projects().all_visible_checked());
    let search = move || state.with(|s| s.projects().search().to_string());

    let on_search = move |ev: Event| {
        let term = event_target_value(&ev);
        state.update(|s| s.set_project_search(&term));
    };

    let on_select_all = move |ev: Event| {
        let checked = event_target_checked(&ev);
        if state.try_update(|s| s.set_visible_projects(checked)).unwrap_or(false) {
            on_change.run(());
        }
    };

    view! {
        <div class="projects">
            <input type="search" placeholder="Search projects" prop:value=search on:input=on_search />
            <label class="block">
                <input type="checkbox" prop:checked=all_checked on:change=on_select_all />
                " Select all"
            </label>
            <Show
                when=move || !visible().is_empty()
                fallback=|| view! { <div class="text-muted">{NO_MATCHING_PROJECTS}</div> }
            >
                <For
                    each=visible
                    key=|project: &ProjectEntry| project.id.clone()
                    children=move |project: ProjectEntry| view! { <ProjectRow state project on_change /> }
                />
            </Show>
        </div>
    }
}

#[component]
fn ProjectRow(state: RwSignal<DashboardState>, project: ProjectEntry, on_change: Callback<()>) -> impl IntoView {
    let ProjectEntry { id, project_name } = project;

    let checked = {
        let id = id.clone();
        move || state.with(|s| s.projects().is_checked(&id))
    };

    let on_toggle = move |ev: Event| {
        let checked = event_target_checked(&ev);
        if state.try_update(|s| s.set_project_checked(&id, checked)).unwrap_or(false) {
            on_change.run(());
        }
    };

    view! {
        <label class="block">
            <input type="checkbox" prop:checked=checked on:change=on_toggle />
            " " {project_name}
        </label>
    }
}
