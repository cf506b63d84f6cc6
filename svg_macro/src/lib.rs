extern crate proc_macro;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{self, Attribute, Data, DeriveInput, Field, Fields, Ident, LitStr, Type, TypePath, Variant, parse_quote, punctuated::Punctuated, token::Comma};

/// Turns an enum of svg tags into typed attribute structs.
///
/// Every variant names a tag with `#[tag("...")]` and lists the types of
/// the attributes it understands. A struct with one `Option<T>` field per
/// listed type is generated in an `attributes` module, the field name is
/// the type's name in snake_case and the attribute key its kebab-case form
/// unless overridden with `#[attr("...")]`. Field types must implement
/// `FromAttribute`, and `AttributeError` must be in scope.
///
/// A single unit variant is allowed and is used for tags not listed.
#[proc_macro_attribute]
pub fn svg_tag(_attributes: TokenStream, items: TokenStream) -> TokenStream {
    let mut ast: DeriveInput = match syn::parse(items) {
	Ok(ast) => ast,
	Err(e) => return e.to_compile_error().into(),
    };

    match impl_svg_tag(&mut ast) {
	Err(e) => e.to_compile_error().into(),
	Ok(r) => r.into(),
    }
}

fn snake_case(input: &str) -> String {
    let mut result = String::with_capacity(input.len() + 4);

    for (i, c) in input.chars().enumerate() {
	if i > 0 && c.is_ascii_uppercase() {
	    result.push('_');
	}
	result.push(c.to_ascii_lowercase());
    }

    result
}

///Removes the first `#[name("...")]` from `attrs` and returns its argument
fn consume_str_attr(attrs: &mut Vec<Attribute>, name: &str) -> syn::Result<Option<String>> {
    let pos = match attrs.iter().position(|attr| attr.path.is_ident(name)) {
	Some(pos) => pos,
	None => return Ok(None),
    };

    let attr = attrs.remove(pos);
    let lit: LitStr = attr.parse_args()?;

    Ok(Some(lit.value()))
}

struct AttributeField {
    name: Ident,
    key: String,
    ty: TypePath,
}

fn parse_fields(fields: &mut Punctuated<Field, Comma>) -> syn::Result<Vec<AttributeField>> {
    let mut result = Vec::new();

    for field in fields.iter_mut() {
	let explicit_key = consume_str_attr(&mut field.attrs, "attr")?;

	let ty = match &field.ty {
	    Type::Path(tp) => tp.clone(),
	    other => return Err(syn::Error::new_spanned(other, "attribute fields must be type paths")),
	};

	let type_name = match ty.path.segments.last() {
	    Some(seg) => seg.ident.clone(),
	    None => return Err(syn::Error::new_spanned(&ty, "invalid type path")),
	};

	let snake = snake_case(&type_name.to_string());
	let key = explicit_key.unwrap_or_else(|| snake.replace('_', "-"));

	result.push(AttributeField {
	    name: Ident::new(&snake, type_name.span()),
	    key,
	    ty,
	});
    }

    Ok(result)
}

struct ParsedVariants {
    attribute_types: Vec<TokenStream2>,
    variants: Punctuated<Variant, Comma>,
    dispatch_arms: Vec<TokenStream2>,
    name_arms: Vec<TokenStream2>,
    fallback: Ident,
}

///Every variant of the tag enum becomes an attributes struct of the same
///name, and the variant is rewritten to hold that struct.
fn parse_variants(mod_name: &Ident, tag_def: &DeriveInput, variants: &Punctuated<Variant, Comma>)
		  -> syn::Result<ParsedVariants>
{
    let enum_name = &tag_def.ident;
    let derives: Vec<&Attribute> = tag_def.attrs.iter()
	.filter(|attr| attr.path.is_ident("derive"))
	.collect();

    let mut attribute_types = Vec::new();
    let mut new_variants = Punctuated::new();
    let mut dispatch_arms = Vec::new();
    let mut name_arms = Vec::new();
    let mut fallback = None;

    for v in variants {
	let mut new_variant = v.clone();
	let ident = &v.ident;
	let tag_name = consume_str_attr(&mut new_variant.attrs, "tag")?;

	let mut fields = match &v.fields {
	    Fields::Unnamed(fs) => fs.unnamed.clone(),
	    Fields::Unit => {
		if fallback.is_some() {
		    return Err(syn::Error::new_spanned(v, "only one unit variant is allowed"));
		}
		fallback = Some(ident.clone());
		new_variants.push(new_variant);
		continue;
	    },
	    Fields::Named(_) => return Err(syn::Error::new_spanned(v, "must use unnamed fields")),
	};

	let tag_name = tag_name
	    .ok_or_else(|| syn::Error::new_spanned(v, "missing #[tag(\"...\")] on variant"))?;

	let fields = parse_fields(&mut fields)?;
	let names: Vec<&Ident> = fields.iter().map(|f| &f.name).collect();
	let keys: Vec<&String> = fields.iter().map(|f| &f.key).collect();
	let types: Vec<&TypePath> = fields.iter().map(|f| &f.ty).collect();
	let docs: Vec<&Attribute> = new_variant.attrs.iter()
	    .filter(|attr| attr.path.is_ident("doc"))
	    .collect();

	let attribute_type = quote! {
	    #(#docs)*
	    #(#derives)*
	    #[derive(Default)]
	    pub struct #ident {
		#(pub #names: Option<#types>),*
	    }

	    impl #ident {
		pub const TAG: &'static str = #tag_name;

		pub fn new() -> Self {
		    Self::default()
		}

		pub fn from_attributes(
		    attributes: &::std::collections::HashMap<String, String>
		) -> Result<Self, AttributeError> {
		    Ok(Self {
			#(#names: match attributes.get(#keys) {
			    Some(raw) => Some(<#types as FromAttribute>::from_attribute(raw)
					      .map_err(|source| AttributeError { name: #keys, source })?),
			    None => None,
			},)*
		    })
		}
	    }
	};

	dispatch_arms.push(quote! {
	    #tag_name => #enum_name::#ident(#mod_name::#ident::from_attributes(attributes)?),
	});
	name_arms.push(quote! {
	    #enum_name::#ident(_) => Some(#tag_name),
	});

	new_variant.fields = Fields::Unnamed(parse_quote!((#mod_name::#ident)));
	new_variants.push(new_variant);
	attribute_types.push(attribute_type);
    }

    let fallback = fallback
	.ok_or_else(|| syn::Error::new_spanned(tag_def, "a unit variant for unknown tags is required"))?;

    Ok(ParsedVariants {
	attribute_types,
	variants: new_variants,
	dispatch_arms,
	name_arms,
	fallback,
    })
}

fn impl_svg_tag(tag: &mut DeriveInput) -> syn::Result<TokenStream2> {
    if !tag.generics.params.is_empty() {
	return Err(syn::Error::new_spanned(&tag.generics, "generic tag enums are not supported"));
    }

    let variants = match &tag.data {
	Data::Enum(data_enum) => data_enum.variants.clone(),
	_ => return Err(syn::Error::new_spanned(&tag.ident, "must be defined with an enum")),
    };

    let mod_name = Ident::new("attributes", proc_macro2::Span::call_site());
    let ParsedVariants {
	attribute_types,
	variants,
	dispatch_arms,
	name_arms,
	fallback,
    } = parse_variants(&mod_name, tag, &variants)?;

    if let Data::Enum(de) = &mut tag.data {
	de.variants = variants;
    }

    let enum_name = &tag.ident;

    Ok(quote! {
	pub mod #mod_name {
	    use super::*;

	    #(
		#attribute_types
	    )*
	}

	#tag

	impl #enum_name {
	    /// Builds the typed tag for an element, validating every
	    /// attribute it understands.
	    pub fn from_element(
		name: &str,
		attributes: &::std::collections::HashMap<String, String>
	    ) -> Result<Self, AttributeError> {
		Ok(match name {
		    #(#dispatch_arms)*
		    _ => #enum_name::#fallback,
		})
	    }

	    /// The element name of a known tag.
	    pub fn name(&self) -> Option<&'static str> {
		match self {
		    #(#name_arms)*
		    #enum_name::#fallback => None,
		}
	    }
	}
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case() {
	assert_eq!(snake_case("StrokeWidth"), "stroke_width");
	assert_eq!(snake_case("X"), "x");
	assert_eq!(snake_case("ViewBoxZ"), "view_box_z");
    }

    #[test]
    fn test_parse_fields_names_and_keys() {
	let mut fields: Punctuated<Field, Comma> = match syn::parse_str::<syn::Variant>(
	    r#"Path(Id, #[attr("d")] Data, StrokeWidth)"#
	).unwrap().fields {
	    Fields::Unnamed(fs) => fs.unnamed,
	    _ => unreachable!(),
	};

	let parsed = parse_fields(&mut fields).unwrap();
	let names: Vec<String> = parsed.iter().map(|f| f.name.to_string()).collect();
	let keys: Vec<&str> = parsed.iter().map(|f| f.key.as_str()).collect();

	assert_eq!(names, vec!["id", "data", "stroke_width"]);
	assert_eq!(keys, vec!["id", "d", "stroke-width"]);
	assert!(fields.iter().all(|f| f.attrs.is_empty()));
    }

    #[test]
    fn test_generated_tag_dispatch() {
	let mut input: DeriveInput = syn::parse_str(r#"
	    #[derive(Debug)]
	    pub enum Tag {
		#[tag("rect")]
		Rectangle(X, Width),
		Other,
	    }
	"#).unwrap();

	let output: syn::File = syn::parse2(impl_svg_tag(&mut input).unwrap()).unwrap();

	let module = output.items.iter().find_map(|item| match item {
	    syn::Item::Mod(m) if m.ident == "attributes" => Some(m),
	    _ => None,
	}).expect("attributes module");
	let (_, items) = module.content.as_ref().unwrap();
	assert!(items.iter().any(|item| matches!(item, syn::Item::Struct(s) if s.ident == "Rectangle")));

	let tag = output.items.iter().find_map(|item| match item {
	    syn::Item::Enum(e) => Some(e),
	    _ => None,
	}).expect("tag enum");
	let rect = &tag.variants[0];
	match &rect.fields {
	    Fields::Unnamed(fs) => {
		let ty = &fs.unnamed[0].ty;
		assert_eq!(quote!(#ty).to_string(), quote!(attributes::Rectangle).to_string());
	    },
	    _ => panic!("variant should hold the attributes struct"),
	}
    }

    #[test]
    fn test_missing_fallback_is_rejected() {
	let mut input: DeriveInput = syn::parse_str(r#"
	    pub enum Tag {
		#[tag("g")]
		Group(Id),
	    }
	"#).unwrap();

	assert!(impl_svg_tag(&mut input).is_err());
    }
}
