use proc_macro::TokenStream as TokenStream1;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, ToTokens};
use syn::punctuated::Punctuated;
use syn::{parse_macro_input, Ident, ImplItemFn, Token};

/// This macro is added before a method of `Table` in the impl block. It makes
/// the method first check that the table is in one of the listed phases.
///
/// For example, `#[allowed_phase(InRound)]` makes a method return
/// `AdvisorError::WrongPhase` unless the current phase is `InRound`. Several
/// phases may be listed, separated by commas.
#[proc_macro_attribute]
pub fn allowed_phase(attr: TokenStream1, item: TokenStream1) -> TokenStream1 {
    let phases = parse_macro_input!(attr with Punctuated::<Ident, Token![,]>::parse_terminated);
    let mut ast = parse_macro_input!(item as ImplItemFn);

    if phases.is_empty() {
        return syn::Error::new_spanned(&ast.sig.ident, "allowed_phase needs at least one phase")
            .to_compile_error()
            .into();
    }

    let operation = ast.sig.ident.to_string();
    let allowed = phases
        .iter()
        .map(Ident::to_string)
        .collect::<Vec<_>>()
        .join(" or ");
    let patterns: Vec<TokenStream2> = phases
        .iter()
        .map(|phase| quote! { crate::TablePhase::#phase })
        .collect();

    let early_return: syn::Stmt = syn::parse_quote! {
        if !matches!(self.phase, #(#patterns)|*) {
            return Err(crate::AdvisorError::WrongPhase {
                operation: #operation,
                allowed: #allowed,
            });
        }
    };
    ast.block.stmts.insert(0, early_return);
    ast.into_token_stream().into()
}
