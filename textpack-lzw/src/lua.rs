//! Companion Pico-8 Lua unpacker.
//!
//! The generated code defines `_t(sid)`, which bootstraps the dictionary on
//! first call and then decodes every 3-character identifier in `sid`,
//! returning the concatenated strings. It follows the same growth rule as
//! [`crate::dictionary::CodeGrowth`]: the last code of a record never
//! allocates an entry, and an allocation is made (and the width checked)
//! right after the code it belongs to is read.
//!
//! Field names are single letters to keep the token count low:
//!
//! - `_tl.t` alphabet, `_tl.a` data address, `_tl.w` initial code width,
//!   `_tl.mt` maximum table entries
//! - `_tl.d` overflow entries (nil until bootstrapped)
//! - `_tl.p` / `_tl.bp` read address and bit position

use crate::config::PackConfig;

const UNPACKER_LUA: &str = r#"
_tl={}
function _tl:c(o) return sub(self.t,o+1,o+1) end
function _tl:o(c)
  for i=1,#self.t do
    if sub(self.t,i,i)==c then return i-1 end
  end
  return 63
end
function _tl:rd(w)
  local c=0
  for bi=0,w-1 do
    c=bor(c,shl(band(shr(peek(self.p),self.bp),1),bi))
    self.bp+=1
    if self.bp==8 then
      self.p+=1
      self.bp=0
    end
  end
  return c
end
function _tl:h()
  local p=self.p
  self.p+=5
  self.bp=0
  return bor(peek(p),shl(peek(p+1),8)),bor(peek(p+2),shl(peek(p+3),8)),peek(p+4)
end
function _tl:init()
  local nt,w=#self.t,self.w
  self.d={}
  self.p=self.a+2
  for ri=1,bor(peek(self.a),shl(peek(self.a+1),8)) do
    local cn=self:h()
    local p,q=nil,nil
    for k=1,cn do
      local c,r=self:rd(w)
      if q~=nil and c==q then
        r=p..sub(p,1,1)
      elseif c<nt then
        r=self:c(c)
      else
        r=self.d[c-nt+1]
      end
      if q~=nil then self.d[q-nt+1]=p..sub(r,1,1) end
      q=nil
      if k<cn and nt+#self.d<self.mt then
        q=nt+#self.d
        if q==2^w-1 then w+=1 end
      end
      p=r
    end
    if self.bp~=0 then
      self.p+=1
      self.bp=0
    end
  end
end
function _t(s)
  local nt,r=#_tl.t,''
  if _tl.d==nil then _tl:init() end
  for i=1,#s,3 do
    _tl.p=bor(bor(_tl:o(sub(s,i,i)),shl(_tl:o(sub(s,i+1,i+1)),6)),shl(_tl:o(sub(s,i+2,i+2)),12))
    local cn,q,w=_tl:h()
    for k=1,cn do
      local c=_tl:rd(w)
      if c<nt then r=r.._tl:c(c) else r=r.._tl.d[c-nt+1] end
      if k<cn and q<_tl.mt then
        if q==2^w-1 then w+=1 end
        q+=1
      end
    end
  end
  return r
end
"#;

/// Quote `s` as a Lua string literal.
///
/// Pico-8 carts cannot hold a backslash, so a double quote is spliced in as
/// a single-quoted literal instead of being escaped. Backslashes, which only
/// a custom alphabet can contain, are still escaped.
fn lua_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\"..'\"'..\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// Render the unpacker followed by its generated parameters.
///
/// Leading indentation is stripped; Pico-8 counts every character.
pub fn generate_lua(config: &PackConfig) -> String {
    let mut lua: String = UNPACKER_LUA
        .lines()
        .map(str::trim_start)
        .filter(|line| !line.is_empty())
        .fold(String::new(), |mut acc, line| {
            acc.push_str(line);
            acc.push('\n');
            acc
        });

    lua.push_str(&format!(
        "_tl.t={}\n_tl.a={}\n_tl.w={}\n_tl.mt={}\n",
        lua_string(config.alphabet.symbols()),
        config.start_addr,
        config.initial_width,
        config.max_entries
    ));
    lua
}
