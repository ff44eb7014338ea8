//! UI registration boundary.
//!
//! The host owns layout and markup. It receives specs plus render callbacks
//! and calls them while drawing its screens.

use crate::admin::column::{VisibilityColumn, COLUMN_ID};
use crate::admin::fields::{FieldLabels, SelectOption, FIELD_NAME};
use crate::model::entity::EntityId;
use crate::repo::meta_repo::{CacheInvalidator, MetadataStore};
use crate::service::visibility_service::VisibilityService;
use log::{error, info};

/// Renders one list-table cell.
pub type CellRenderer<'a> = Box<dyn Fn(&EntityId) -> String + 'a>;
/// Renders add/edit form options; `None` on the add form.
pub type FormFieldRenderer<'a> = Box<dyn Fn(Option<&EntityId>) -> Vec<SelectOption> + 'a>;
/// Renders quick-edit options; the host binds the row value client-side.
pub type QuickEditRenderer<'a> = Box<dyn Fn() -> Vec<SelectOption> + 'a>;

/// Column registration metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub id: &'static str,
    pub header: String,
    pub sortable: bool,
}

/// Form field registration metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub labels: FieldLabels,
}

/// Host UI registration points.
pub trait UiRegistrar<'a> {
    fn register_column(&mut self, spec: ColumnSpec, render: CellRenderer<'a>);
    fn register_form_field(&mut self, spec: FieldSpec, render: FormFieldRenderer<'a>);
    fn register_quick_edit_field(&mut self, spec: FieldSpec, render: QuickEditRenderer<'a>);
}

/// Registers the visibility column, form field and quick-edit field.
pub fn register_visibility_ui<'a, R, M, C>(
    registrar: &mut R,
    service: &'a VisibilityService<M, C>,
    labels: FieldLabels,
) where
    R: UiRegistrar<'a> + ?Sized,
    M: MetadataStore,
    C: CacheInvalidator,
{
    let column = VisibilityColumn::new(service);
    registrar.register_column(
        ColumnSpec {
            id: COLUMN_ID,
            header: labels.singular.clone(),
            sortable: true,
        },
        Box::new(move |entity: &EntityId| column.cell(entity)),
    );

    registrar.register_form_field(
        FieldSpec {
            name: FIELD_NAME,
            labels: labels.clone(),
        },
        Box::new(move |entity: Option<&EntityId>| {
            service.select_options_for(entity).unwrap_or_else(|err| {
                error!(
                    "event=form_field_render module=admin status=error error={}",
                    err
                );
                service.select_options_for(None).unwrap_or_default()
            })
        }),
    );

    registrar.register_quick_edit_field(
        FieldSpec {
            name: FIELD_NAME,
            labels,
        },
        Box::new(move || service.select_options_for(None).unwrap_or_default()),
    );

    info!("event=ui_register module=admin status=ok column={COLUMN_ID} field={FIELD_NAME}");
}

#[cfg(test)]
mod tests {
    use super::{
        register_visibility_ui, CellRenderer, ColumnSpec, FieldSpec, FormFieldRenderer,
        QuickEditRenderer, UiRegistrar,
    };
    use crate::admin::fields::FieldLabels;
    use crate::model::entity::{parse_scope, EntityId};
    use crate::registry::vocabulary::VisibilityRegistry;
    use crate::repo::memory::MemoryMetadataStore;
    use crate::repo::meta_repo::NoopCacheInvalidator;
    use crate::service::visibility_service::VisibilityService;
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeScreen<'a> {
        columns: Vec<(ColumnSpec, CellRenderer<'a>)>,
        form_fields: Vec<(FieldSpec, FormFieldRenderer<'a>)>,
        quick_edit_fields: Vec<(FieldSpec, QuickEditRenderer<'a>)>,
    }

    impl<'a> UiRegistrar<'a> for FakeScreen<'a> {
        fn register_column(&mut self, spec: ColumnSpec, render: CellRenderer<'a>) {
            self.columns.push((spec, render));
        }

        fn register_form_field(&mut self, spec: FieldSpec, render: FormFieldRenderer<'a>) {
            self.form_fields.push((spec, render));
        }

        fn register_quick_edit_field(&mut self, spec: FieldSpec, render: QuickEditRenderer<'a>) {
            self.quick_edit_fields.push((spec, render));
        }
    }

    #[test]
    fn registers_all_three_renderers() {
        let service = VisibilityService::from_parts(
            MemoryMetadataStore::new(),
            NoopCacheInvalidator,
            Arc::new(VisibilityRegistry::default()),
            "—",
        );
        let entity = EntityId::from(42_u64);
        service
            .set_visibility(&entity, &parse_scope("category").unwrap(), "hidden", false)
            .unwrap();

        let mut screen = FakeScreen::default();
        register_visibility_ui(&mut screen, &service, FieldLabels::default());

        assert_eq!(screen.columns.len(), 1);
        let (column_spec, cell) = &screen.columns[0];
        assert_eq!(column_spec.id, "visibility");
        assert!(column_spec.sortable);
        assert_eq!(cell(&entity), "Hidden");

        let (field_spec, form) = &screen.form_fields[0];
        assert_eq!(field_spec.name, "term-visibility");
        assert!(form(Some(&entity)).iter().any(|o| o.id == "hidden" && o.selected));

        let (_, quick_edit) = &screen.quick_edit_fields[0];
        assert_eq!(quick_edit().len(), 3);
    }
}
