use darling::FromDeriveInput as _;
use proc_macro2::TokenStream;
use syn::parse_macro_input;

use self::{
    builder::{FieldIdent, InitBuilder, TrivialBuilder},
    meta::Input,
};

mod builder;
mod meta;
mod sgen;

/// Derive macro `#[derive(Trivial)]` marking a struct as trivial.
///
/// The struct must also implement `Copy`, and every field type must be
/// [`Trivial`]. A trivial struct gets [`DefaultInit`] and [`ValueInit`] from
/// the blanket implementations, so it must not also derive `DefaultInit`.
///
/// # Struct-level Attributes
///
/// * `#[placement(crate = path)]`
///
///   Specifies the path to the `placement` crate. If omitted, it defaults to
///   `::placement`.
///
/// # Example
///
/// ```rust
/// use core::mem::MaybeUninit;
///
/// use placement::{Trivial, value_construct_at};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Trivial)]
/// struct Header {
///     magic: [u8; 4],
///     version: u16,
///     flags: u16,
/// }
///
/// let mut slot = MaybeUninit::<Header>::uninit();
/// let header = unsafe { *value_construct_at(slot.as_mut_ptr()) };
/// assert_eq!(header, Header { magic: [0; 4], version: 0, flags: 0 });
/// ```
///
/// A field that is not trivial is rejected:
///
/// ```rust,compile_fail
/// use placement::Trivial;
///
/// #[derive(Clone, Copy, Trivial)]
/// struct Borrowed {
///     name: &'static str,
/// }
/// ```
///
/// [`Trivial`]: ::placement::Trivial
/// [`DefaultInit`]: ::placement::DefaultInit
/// [`ValueInit`]: ::placement::ValueInit
#[proc_macro_derive(Trivial, attributes(placement))]
pub fn derive_trivial(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as syn::DeriveInput);

    generate_trivial_impl(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Derive macro `#[derive(DefaultInit)]` implementing both [`DefaultInit`]
/// and [`ValueInit`] for a struct.
///
/// The generated implementations initialize the slot field by field, in
/// declaration order. A field is default-initialized (or value-initialized)
/// through its own type, so a trivial field is left indeterminate by
/// `default_init` and zeroed by `value_init`, while a field with a
/// user-provided constructor runs it in both cases.
///
/// # Restrictions
///
/// * Only supports structs. Enums and unions are not supported.
/// * Do not combine with `#[derive(Trivial)]`; trivial structs already
///   implement both traits.
///
/// # Struct-level Attributes
///
/// * `#[placement(crate = path)]`
///
///   Specifies the path to the `placement` crate. If omitted, it defaults to
///   `::placement`.
///
/// * `#[placement(default)]`
///
///   The struct has a user-provided constructor: both initializations
///   construct it from [`Default::default()`]. Field attributes are not
///   allowed together with this.
///
/// # Field-level Attributes
///
/// * `#[placement(value = expr)]`
///
///   The field has a default member initializer: both initializations
///   construct it from `expr`.
///
/// # Example
///
/// ```rust
/// use core::mem::MaybeUninit;
///
/// use placement::{DefaultInit, default_construct_at, value_construct_at};
///
/// #[derive(DefaultInit)]
/// struct Buffer {
///     data: [u8; 16],
///     #[placement(value = 16)]
///     capacity: usize,
///     label: String,
/// }
///
/// let mut slot = MaybeUninit::<Buffer>::uninit();
/// let buffer = unsafe {
///     let buffer = default_construct_at(slot.as_mut_ptr());
///     // `data` is indeterminate until written; the other fields are set.
///     (&raw mut (*buffer).data).write([1; 16]);
///     slot.assume_init_mut()
/// };
/// assert_eq!(buffer.capacity, 16);
/// assert!(buffer.label.is_empty());
/// unsafe { slot.assume_init_drop() };
///
/// let buffer = unsafe {
///     value_construct_at(slot.as_mut_ptr());
///     slot.assume_init_read()
/// };
/// assert_eq!(buffer.data, [0; 16]);
/// ```
///
/// [`DefaultInit`]: ::placement::DefaultInit
/// [`ValueInit`]: ::placement::ValueInit
#[proc_macro_derive(DefaultInit, attributes(placement))]
pub fn derive_default_init(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as syn::DeriveInput);

    generate_init_impl(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn generate_trivial_impl(input: &syn::DeriveInput) -> Result<TokenStream, syn::Error> {
    let (header, fields) = Input::from_derive_input(input)?.take_fields();

    let mut builder = TrivialBuilder::new(header)?;
    let mut errors = darling::Error::accumulator();
    for field in fields {
        if let Err(err) = builder.add_field(field) {
            errors.push(err);
        }
    }
    errors.finish()?;

    Ok(builder.build())
}

fn generate_init_impl(input: &syn::DeriveInput) -> Result<TokenStream, syn::Error> {
    let (header, fields) = Input::from_derive_input(input)?.take_fields();

    let use_default_trait = header.default;
    let mut builder = InitBuilder::new(header);

    if use_default_trait {
        let mut errors = darling::Error::accumulator();
        for field in &fields {
            if let Some(value) = &field.value {
                errors.push(
                    darling::Error::custom(
                        "`#[placement(value = ...)]` cannot be used with `#[placement(default)]`",
                    )
                    .with_span(value),
                );
            }
        }
        errors.finish()?;
        builder.use_default_trait();
    } else {
        for field in fields {
            builder.add_field(field);
        }
    }

    Ok(builder.build())
}
