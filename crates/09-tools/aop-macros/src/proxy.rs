//! 代理生成宏实现

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{quote, ToTokens};
use syn::{
    parse::Parse, parse::ParseStream, parse_macro_input, punctuated::Punctuated, spanned::Spanned, Error,
    Expr, FnArg, ImplItem, ImplItemFn, ItemImpl, Lit, Meta, Pat, Path, Result, ReturnType, Token, Type,
};

/// 宏参数
#[derive(Debug, Clone)]
struct ProxyArgs {
    /// 生成代码引用的 crate 路径
    root: Path,
}

impl Default for ProxyArgs {
    fn default() -> Self {
        Self {
            root: syn::parse_quote!(::ioc_aop),
        }
    }
}

impl Parse for ProxyArgs {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let mut args = ProxyArgs::default();

        let parsed = Punctuated::<Meta, Token![,]>::parse_terminated(input)?;
        for meta in parsed {
            match meta {
                Meta::NameValue(nv) if nv.path.is_ident("root") => {
                    let Expr::Lit(expr_lit) = &nv.value else {
                        return Err(Error::new(nv.value.span(), "root 需要字符串字面量"));
                    };
                    let Lit::Str(lit_str) = &expr_lit.lit else {
                        return Err(Error::new(expr_lit.span(), "root 需要字符串字面量"));
                    };
                    let crate_name: Path = lit_str.parse()?;
                    args.root = syn::parse_quote!(::#crate_name);
                }
                other => {
                    return Err(Error::new(other.span(), "不支持的参数，只接受 root = \"...\""));
                }
            }
        }

        Ok(args)
    }
}

/// 宏入口
pub fn aop_proxy_impl(args: TokenStream, input: TokenStream) -> TokenStream {
    let args = parse_macro_input!(args as ProxyArgs);
    let item = parse_macro_input!(input as ItemImpl);

    match expand(&args, &item) {
        Ok(proxy_impl) => quote! {
            #item
            #proxy_impl
        }
        .into(),
        Err(error) => {
            let error = error.to_compile_error();
            quote! {
                #item
                #error
            }
            .into()
        }
    }
}

fn expand(args: &ProxyArgs, item: &ItemImpl) -> Result<TokenStream2> {
    let Some((None, trait_path, _)) = &item.trait_ else {
        return Err(Error::new(
            Span::call_site(),
            "#[aop_proxy] 只能用于 `impl Trait for Type`",
        ));
    };
    if !item.generics.params.is_empty() {
        return Err(Error::new(item.generics.span(), "#[aop_proxy] 不支持泛型实现"));
    }

    let root = &args.root;
    let self_ty = &item.self_ty;

    let mut items = Vec::new();
    for impl_item in &item.items {
        match impl_item {
            ImplItem::Fn(method) => items.push(proxy_method(root, self_ty, trait_path, method)?),
            ImplItem::Type(assoc) => items.push(assoc.to_token_stream()),
            ImplItem::Const(assoc) => items.push(assoc.to_token_stream()),
            other => return Err(Error::new(other.span(), "#[aop_proxy] 不支持的实现项")),
        }
    }

    Ok(quote! {
        impl #trait_path for #root::AopProxy<#self_ty> {
            #(#items)*
        }
    })
}

fn proxy_method(root: &Path, self_ty: &Type, trait_path: &Path, method: &ImplItemFn) -> Result<TokenStream2> {
    let sig = &method.sig;
    if sig.asyncness.is_some() {
        return Err(Error::new(sig.span(), "被代理的方法不能是 async"));
    }
    if !sig.generics.params.is_empty() {
        return Err(Error::new(sig.generics.span(), "被代理的方法不能带泛型参数"));
    }
    check_return_type(&sig.output)?;

    let mut inputs = sig.inputs.iter();
    match inputs.next() {
        Some(FnArg::Receiver(receiver)) if receiver.reference.is_some() && receiver.mutability.is_none() => {}
        _ => return Err(Error::new(sig.span(), "被代理的方法必须接收 &self")),
    }

    let mut names = Vec::new();
    let mut captured = Vec::new();
    let mut type_literals = Vec::new();
    for input in inputs {
        let FnArg::Typed(typed) = input else {
            return Err(Error::new(input.span(), "意外的 self 参数"));
        };
        let Pat::Ident(pat) = typed.pat.as_ref() else {
            return Err(Error::new(typed.pat.span(), "被代理方法的参数必须是简单标识符"));
        };
        let name = &pat.ident;
        captured.push(match typed.ty.as_ref() {
            Type::Reference(_) => quote! { #root::Argument::new(::std::borrow::ToOwned::to_owned(#name)) },
            _ => quote! { #root::Argument::new(::std::clone::Clone::clone(&#name)) },
        });
        names.push(name.clone());
        type_literals.push(typed.ty.to_token_stream().to_string());
    }

    let method_name = &sig.ident;
    let method_literal = method_name.to_string();
    let attrs = method.attrs.iter().filter(|attr| !attr.path().is_ident("doc"));

    Ok(quote! {
        #(#attrs)*
        #sig {
            let __args = ::std::vec![#(#captured),*];
            self.invoke(#method_literal, &[#(#type_literals),*], __args, move |__target: &#self_ty| {
                <#self_ty as #trait_path>::#method_name(__target, #(#names),*)
            })
        }
    })
}

fn check_return_type(output: &ReturnType) -> Result<()> {
    let ReturnType::Type(_, ty) = output else {
        return Err(Error::new(output.span(), "被代理的方法必须返回 MethodResult"));
    };
    let Type::Path(type_path) = ty.as_ref() else {
        return Err(Error::new(ty.span(), "被代理的方法必须返回 MethodResult"));
    };
    match type_path.path.segments.last() {
        Some(segment) if segment.ident == "MethodResult" || segment.ident == "Result" => Ok(()),
        _ => Err(Error::new(ty.span(), "被代理的方法必须返回 MethodResult")),
    }
}
