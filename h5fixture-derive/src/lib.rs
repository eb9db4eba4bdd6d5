#![recursion_limit = "192"]

use std::str::FromStr;

use proc_macro2::{Ident, Span, TokenStream};
use proc_macro_error::{abort, proc_macro_error};
use quote::quote;
use syn::{
    parse_macro_input, parse_quote, Attribute, Data, DeriveInput, Expr, Fields, GenericParam,
    Generics, LitStr, Member, Type, TypePath,
};

#[proc_macro_derive(H5Type, attributes(hdf5))]
#[proc_macro_error]
pub fn derive_h5type(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let generics = add_bounds(input.generics.clone(), quote!(::h5fixture::types::H5Type));
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let body = impl_h5type(&input.data, &input.attrs);
    let expanded = quote! {
        #[automatically_derived]
        #[allow(unused_variables, unused_qualifications)]
        impl #impl_generics ::h5fixture::types::H5Type for #name #ty_generics #where_clause {
            #body
        }
    };
    proc_macro::TokenStream::from(expanded)
}

#[proc_macro_derive(Cycled)]
#[proc_macro_error]
pub fn derive_cycled(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let generics = add_bounds(input.generics.clone(), quote!(::h5fixture::types::Cycled));
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let body = impl_cycled(&input.data);
    let expanded = quote! {
        #[automatically_derived]
        impl #impl_generics ::h5fixture::types::Cycled for #name #ty_generics #where_clause {
            #[inline]
            fn cycled(index: u64) -> Self {
                #body
            }
        }
    };
    proc_macro::TokenStream::from(expanded)
}

fn add_bounds(mut generics: Generics, bound: TokenStream) -> Generics {
    for param in &mut generics.params {
        if let GenericParam::Type(ref mut ty) = *param {
            ty.bounds.push(parse_quote!(#bound));
        }
    }
    generics
}

struct FieldInfo {
    member: Member,
    name: String,
    ty: Type,
    phantom: bool,
}

fn is_phantom_data(ty: &Type) -> bool {
    match *ty {
        Type::Path(TypePath { qself: None, ref path }) => {
            path.segments.last().map_or(false, |x| x.ident == "PhantomData")
        }
        _ => false,
    }
}

fn collect_reprs(attrs: &[Attribute]) -> Vec<Ident> {
    let mut reprs = Vec::new();
    for attr in attrs.iter().filter(|a| a.path().is_ident("repr")) {
        let res = attr.parse_nested_meta(|meta| {
            if let Some(ident) = meta.path.get_ident() {
                reprs.push(ident.clone());
            }
            if meta.input.peek(syn::token::Paren) {
                // packed(N), align(N)
                let content;
                syn::parenthesized!(content in meta.input);
                let _: TokenStream = content.parse()?;
            }
            Ok(())
        });
        if let Err(err) = res {
            abort!(attr, "unable to parse repr attribute: {}", err);
        }
    }
    reprs
}

fn find_repr(attrs: &[Attribute], expected: &[&str]) -> Option<Ident> {
    collect_reprs(attrs).into_iter().find(|ident| expected.iter().any(|&s| ident == s))
}

fn find_rename(attrs: &[Attribute]) -> Option<String> {
    let mut rename = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("hdf5")) {
        let res = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let name: LitStr = meta.value()?.parse()?;
                rename = Some(name.value());
                Ok(())
            } else {
                Err(meta.error("expected `rename = \"...\"`"))
            }
        });
        if let Err(err) = res {
            abort!(attr, "invalid hdf5 attribute: {}", err);
        }
    }
    rename
}

fn collect_fields(fields: &Fields) -> Vec<FieldInfo> {
    fields
        .iter()
        .enumerate()
        .map(|(i, f)| {
            let member = match f.ident {
                Some(ref ident) => Member::Named(ident.clone()),
                None => Member::Unnamed(i.into()),
            };
            let default_name = match member {
                Member::Named(ref ident) => ident.to_string(),
                Member::Unnamed(ref index) => index.index.to_string(),
            };
            FieldInfo {
                name: find_rename(&f.attrs).unwrap_or(default_name),
                member,
                ty: f.ty.clone(),
                phantom: is_phantom_data(&f.ty),
            }
        })
        .collect()
}

fn impl_compound(fields: &[FieldInfo], packed: bool) -> TokenStream {
    let stored: Vec<_> = fields.iter().filter(|f| !f.phantom).collect();
    let members: Vec<_> = stored.iter().map(|f| &f.member).collect();
    let names: Vec<_> = stored.iter().map(|f| &f.name).collect();
    let types: Vec<_> = stored.iter().map(|f| &f.ty).collect();
    let indices = 0..stored.len();
    let reads: Vec<_> = members
        .iter()
        .map(|m| if packed { quote!(&{ self.#m }) } else { quote!(&self.#m) })
        .collect();
    let inits = fields.iter().map(|f| {
        let (member, ty, name) = (&f.member, &f.ty, &f.name);
        if f.phantom {
            quote!(#member: ::core::marker::PhantomData)
        } else {
            quote!(#member: <#ty as ::h5fixture::types::H5Type>::from_value(value.field(#name)?)?)
        }
    });
    quote! {
        fn type_descriptor() -> ::h5fixture::types::TypeDescriptor {
            let mut fields = vec![#(
                ::h5fixture::types::CompoundField::typed::<#types>(
                    #names, ::core::mem::offset_of!(Self, #members), #indices
                )
            ),*];
            fields.sort_by_key(|f| f.offset);
            ::h5fixture::types::TypeDescriptor::Compound(::h5fixture::types::CompoundType {
                fields,
                size: ::core::mem::size_of::<Self>(),
            })
        }

        fn to_value(&self) -> ::h5fixture::types::Value {
            ::h5fixture::types::Value::Compound(vec![#(
                (#names.to_owned(), ::h5fixture::types::H5Type::to_value(#reads))
            ),*])
        }

        fn from_value(
            value: &::h5fixture::types::Value,
        ) -> ::core::result::Result<Self, ::h5fixture::types::ValueError> {
            Ok(Self { #(#inits),* })
        }
    }
}

fn impl_transparent(fields: &[FieldInfo]) -> TokenStream {
    let inner = match fields.iter().find(|f| !f.phantom) {
        Some(f) => f,
        None => abort!(Span::call_site(), "H5Type requires a non-zero-sized field"),
    };
    let (member, ty) = (&inner.member, &inner.ty);
    let inits = fields.iter().map(|f| {
        let member = &f.member;
        if f.phantom {
            quote!(#member: ::core::marker::PhantomData)
        } else {
            quote!(#member: <#ty as ::h5fixture::types::H5Type>::from_value(value)?)
        }
    });
    quote! {
        #[inline]
        fn type_descriptor() -> ::h5fixture::types::TypeDescriptor {
            <#ty as ::h5fixture::types::H5Type>::type_descriptor()
        }

        #[inline]
        fn to_value(&self) -> ::h5fixture::types::Value {
            ::h5fixture::types::H5Type::to_value(&self.#member)
        }

        fn from_value(
            value: &::h5fixture::types::Value,
        ) -> ::core::result::Result<Self, ::h5fixture::types::ValueError> {
            Ok(Self { #(#inits),* })
        }
    }
}

fn impl_enum(
    variants: Vec<Ident>, names: Vec<String>, discriminants: Vec<&Expr>, repr: &Ident,
) -> TokenStream {
    let repr_str = repr.to_string();
    let signed = repr_str.starts_with('i');
    let size = match usize::from_str(&repr_str[1..]) {
        Ok(bits) => {
            let size = Ident::new(&format!("U{}", bits / 8), Span::call_site());
            quote!(::h5fixture::types::IntSize::#size)
        }
        Err(_) => quote! {
            match ::core::mem::size_of::<#repr>() {
                4 => ::h5fixture::types::IntSize::U4,
                _ => ::h5fixture::types::IntSize::U8,
            }
        },
    };
    quote! {
        fn type_descriptor() -> ::h5fixture::types::TypeDescriptor {
            ::h5fixture::types::TypeDescriptor::Enum(::h5fixture::types::EnumType {
                size: #size,
                signed: #signed,
                members: vec![#(
                    ::h5fixture::types::EnumMember {
                        name: #names.to_owned(),
                        value: (#discriminants) as #repr as u64,
                    }
                ),*],
            })
        }

        fn to_value(&self) -> ::h5fixture::types::Value {
            let (name, value) = match self {
                #(Self::#variants => (#names, Self::#variants as #repr as u64)),*
            };
            ::h5fixture::types::Value::Enum(::h5fixture::types::EnumValue {
                name: name.to_owned(),
                value,
            })
        }

        fn from_value(
            value: &::h5fixture::types::Value,
        ) -> ::core::result::Result<Self, ::h5fixture::types::ValueError> {
            let bits = value.enum_bits()?;
            #(
                if bits == Self::#variants as #repr as u64 {
                    return Ok(Self::#variants);
                }
            )*
            Err(::h5fixture::types::ValueError::UnknownVariant(bits))
        }
    }
}

fn impl_h5type(data: &Data, attrs: &[Attribute]) -> TokenStream {
    match *data {
        Data::Struct(ref data) => {
            if let Fields::Unit = data.fields {
                abort!(Span::call_site(), "cannot derive H5Type for unit structs");
            }
            let fields = collect_fields(&data.fields);
            if fields.iter().all(|f| f.phantom) {
                abort!(Span::call_site(), "cannot derive H5Type for empty structs");
            }
            let reprs: Vec<_> = collect_reprs(attrs).iter().map(ToString::to_string).collect();
            let has = |name: &str| reprs.iter().any(|r| r == name);
            if has("packed") {
                impl_compound(&fields, true)
            } else if has("C") {
                impl_compound(&fields, false)
            } else if has("transparent") {
                impl_transparent(&fields)
            } else {
                abort!(
                    Span::call_site(),
                    "H5Type requires repr(C), repr(packed) or repr(transparent) for structs"
                )
            }
        }
        Data::Enum(ref data) => {
            if data.variants.is_empty() {
                abort!(Span::call_site(), "cannot derive H5Type for empty enums");
            }
            let mut variants = Vec::new();
            let mut names = Vec::new();
            let mut discriminants = Vec::new();
            for variant in &data.variants {
                match (&variant.fields, &variant.discriminant) {
                    (Fields::Unit, Some((_, expr))) => {
                        variants.push(variant.ident.clone());
                        names.push(
                            find_rename(&variant.attrs).unwrap_or_else(|| variant.ident.to_string()),
                        );
                        discriminants.push(expr);
                    }
                    _ => abort!(
                        variant,
                        "H5Type can only be derived for enums with scalar discriminants"
                    ),
                }
            }
            let enum_reprs =
                &["i8", "i16", "i32", "i64", "u8", "u16", "u32", "u64", "isize", "usize"];
            match find_repr(attrs, enum_reprs) {
                Some(repr) => impl_enum(variants, names, discriminants, &repr),
                None => abort!(
                    Span::call_site(),
                    "H5Type can only be derived for enums with explicit representation"
                ),
            }
        }
        Data::Union(_) => abort!(Span::call_site(), "cannot derive H5Type for unions"),
    }
}

fn impl_cycled(data: &Data) -> TokenStream {
    match *data {
        Data::Struct(ref data) => {
            let inits = collect_fields(&data.fields).into_iter().map(|f| {
                let member = f.member;
                quote!(#member: ::h5fixture::types::Cycled::cycled(index))
            });
            quote!(Self { #(#inits),* })
        }
        Data::Enum(ref data) => {
            let last = match data.variants.last() {
                Some(v) => &v.ident,
                None => abort!(Span::call_site(), "cannot derive Cycled for empty enums"),
            };
            if let Some(v) = data.variants.iter().find(|v| !matches!(v.fields, Fields::Unit)) {
                abort!(v, "Cycled can only be derived for enums with unit variants");
            }
            let count = data.variants.len() as u64;
            let arms = data.variants.iter().enumerate().map(|(i, v)| {
                let ident = &v.ident;
                let i = i as u64;
                quote!(#i => Self::#ident)
            });
            quote! {
                match index % #count {
                    #(#arms,)*
                    _ => Self::#last,
                }
            }
        }
        Data::Union(_) => abort!(Span::call_site(), "cannot derive Cycled for unions"),
    }
}
